//! Menu tree display.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use menuadmin_core::error::AppError;
use menuadmin_core::types::MenuNode;

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for the tree command
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Only list nodes that can be a parent (groups and collapses)
    #[arg(long)]
    pub parents: bool,
}

/// One node of the tree, indented by depth
#[derive(Debug, Serialize, Tabled)]
pub struct NodeRow {
    /// Node ID
    id: i64,
    /// Title, indented by depth
    title: String,
    /// Id key
    id_key: String,
    /// Node type
    kind: String,
    /// Sibling position
    order: i32,
    /// URL (items only)
    url: String,
}

impl NodeRow {
    /// Build a row; `depth` indents the title.
    pub fn new(depth: usize, node: &MenuNode) -> Self {
        Self {
            id: node.id.get(),
            title: format!("{}{}", "  ".repeat(depth), node.title),
            id_key: node.id_key.clone(),
            kind: node.kind.to_string(),
            order: node.order,
            url: node.url.clone().unwrap_or_default(),
        }
    }
}

/// Execute the tree command
pub async fn execute(args: &TreeArgs, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    let tree = ctx.store.reload().await?;

    if args.parents {
        let rows: Vec<NodeRow> = tree
            .parent_candidates()
            .into_iter()
            .map(|node| NodeRow::new(0, node))
            .collect();
        output::print_list(&rows, format);
        return Ok(());
    }

    match format {
        OutputFormat::Json => output::print_json(&tree.to_forest()),
        OutputFormat::Table => {
            let rows: Vec<NodeRow> = tree
                .depth_first()
                .into_iter()
                .map(|(depth, node)| NodeRow::new(depth, node))
                .collect();
            output::print_list(&rows, format);
        }
    }
    Ok(())
}
