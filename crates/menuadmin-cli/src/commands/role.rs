//! Role menu permission commands.

use std::collections::BTreeSet;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use menuadmin_core::error::AppError;
use menuadmin_core::types::{MenuId, RoleId, RoleMenuItem};
use menuadmin_service::RolePermissionEditor;

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for role commands
#[derive(Debug, Args)]
pub struct RoleArgs {
    /// Role subcommand
    #[command(subcommand)]
    pub command: RoleCommand,
}

/// Role subcommands
#[derive(Debug, Subcommand)]
pub enum RoleCommand {
    /// Show the menu tree with the role's assignments
    Show {
        /// Role ID
        role_id: RoleId,
    },
    /// Check menu nodes for a role; subtrees and ancestors follow
    Grant {
        /// Role ID
        role_id: RoleId,
        /// Menu node IDs
        #[arg(required = true)]
        menu_ids: Vec<MenuId>,
    },
    /// Uncheck menu nodes for a role; subtrees and emptied ancestors follow
    Revoke {
        /// Role ID
        role_id: RoleId,
        /// Menu node IDs
        #[arg(required = true)]
        menu_ids: Vec<MenuId>,
    },
}

/// One node of a role's tree
#[derive(Debug, Serialize, Tabled)]
struct AssignmentRow {
    /// Assigned marker
    assigned: String,
    /// Node ID
    id: i64,
    /// Title, indented by depth
    title: String,
    /// Node type
    kind: String,
}

/// Execute role commands
pub async fn execute(args: &RoleArgs, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        RoleCommand::Show { role_id } => {
            let editor = open(ctx, *role_id).await?;
            show(&editor, format);
        }
        RoleCommand::Grant { role_id, menu_ids } => {
            let editor = toggle_all(ctx, *role_id, menu_ids, true).await?;
            show(&editor, format);
        }
        RoleCommand::Revoke { role_id, menu_ids } => {
            let editor = toggle_all(ctx, *role_id, menu_ids, false).await?;
            show(&editor, format);
        }
    }
    Ok(())
}

async fn open(ctx: &Context, role_id: RoleId) -> Result<RolePermissionEditor, AppError> {
    RolePermissionEditor::open(ctx.api.clone(), ctx.notifier.clone(), role_id).await
}

async fn toggle_all(
    ctx: &Context,
    role_id: RoleId,
    menu_ids: &[MenuId],
    checked: bool,
) -> Result<RolePermissionEditor, AppError> {
    let mut editor = open(ctx, role_id).await?;
    let before: BTreeSet<MenuId> = editor.assigned_ids().into_iter().collect();

    for id in menu_ids {
        if !editor.toggle(*id, checked) {
            output::print_warning(&format!("Menu node {id} is not in the tree; skipped"));
        }
    }

    let after: BTreeSet<MenuId> = editor.assigned_ids().into_iter().collect();
    if before == after {
        output::print_info("Nothing to save");
        return Ok(editor);
    }
    editor.save().await?;
    Ok(editor)
}

fn show(editor: &RolePermissionEditor, format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_json(&editor.items()),
        OutputFormat::Table => {
            let mut rows = Vec::new();
            flatten(&editor.items(), 0, &mut rows);
            output::print_list(&rows, format);
        }
    }
}

fn flatten(items: &[RoleMenuItem], depth: usize, rows: &mut Vec<AssignmentRow>) {
    for item in items {
        rows.push(AssignmentRow {
            assigned: if item.assigned { "[x]" } else { "[ ]" }.to_string(),
            id: item.node.id.get(),
            title: format!("{}{}", "  ".repeat(depth), item.node.title),
            kind: item.node.kind.to_string(),
        });
        flatten(&item.children, depth + 1, rows);
    }
}
