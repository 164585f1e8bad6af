//! Item commands.

use clap::{Args, Subcommand};

use menuadmin_core::error::AppError;
use menuadmin_core::types::MenuId;
use menuadmin_service::ItemInput;

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for item commands
#[derive(Debug, Args)]
pub struct ItemArgs {
    /// Item subcommand
    #[command(subcommand)]
    pub command: ItemCommand,
}

/// Item subcommands
#[derive(Debug, Subcommand)]
pub enum ItemCommand {
    /// Create an item under a group or collapse; the URL is derived
    Create {
        /// Parent node ID
        #[arg(short, long)]
        parent_id: MenuId,
        /// Id key (lowercased, whitespace removed)
        #[arg(short, long)]
        id_key: String,
        /// Title
        #[arg(short, long)]
        title: String,
        /// Icon name
        #[arg(long)]
        icon: Option<String>,
        /// Caption
        #[arg(long)]
        caption: Option<String>,
        /// The URL points outside the console
        #[arg(long)]
        external: bool,
        /// Open in a new tab
        #[arg(long)]
        target_blank: bool,
        /// Hide breadcrumbs on the target page
        #[arg(long)]
        no_breadcrumbs: bool,
    },
}

/// Execute item commands
pub async fn execute(args: &ItemArgs, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    let coordinator = ctx.coordinator().await?;

    match &args.command {
        ItemCommand::Create {
            parent_id,
            id_key,
            title,
            icon,
            caption,
            external,
            target_blank,
            no_breadcrumbs,
        } => {
            coordinator.begin_create_item(Some(*parent_id));
            let input = ItemInput {
                icon: icon.clone(),
                caption: caption.clone(),
                external: *external,
                target_blank: *target_blank,
                breadcrumbs: !no_breadcrumbs,
                ..ItemInput::new(id_key.as_str(), title.as_str(), Some(*parent_id))
            };
            let node = coordinator.create_item(input).await?;

            match format {
                OutputFormat::Json => output::print_json(&node),
                OutputFormat::Table => {
                    output::print_kv("id", &node.id.to_string());
                    output::print_kv("idKey", &node.id_key);
                    output::print_kv("url", node.url.as_deref().unwrap_or_default());
                }
            }
        }
    }

    Ok(())
}
