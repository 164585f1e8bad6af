//! Group and collapse commands.

use clap::{Args, Subcommand};

use menuadmin_core::error::AppError;
use menuadmin_core::types::MenuKind;
use menuadmin_service::GroupInput;

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for group commands
#[derive(Debug, Args)]
pub struct GroupArgs {
    /// Group subcommand
    #[command(subcommand)]
    pub command: GroupCommand,
}

/// Group subcommands
#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    /// Create a root group or collapse
    Create {
        /// Id key (lowercased, whitespace removed)
        #[arg(short, long)]
        id_key: String,
        /// Title
        #[arg(short, long)]
        title: String,
        /// Create a collapse instead of a group
        #[arg(long)]
        collapse: bool,
        /// Icon name
        #[arg(long)]
        icon: Option<String>,
        /// Caption
        #[arg(long)]
        caption: Option<String>,
    },
}

/// Execute group commands
pub async fn execute(args: &GroupArgs, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    let coordinator = ctx.coordinator().await?;

    match &args.command {
        GroupCommand::Create {
            id_key,
            title,
            collapse,
            icon,
            caption,
        } => {
            coordinator.begin_create_group();
            let input = GroupInput {
                kind: if *collapse {
                    MenuKind::Collapse
                } else {
                    MenuKind::Group
                },
                icon: icon.clone(),
                caption: caption.clone(),
                ..GroupInput::new(id_key.as_str(), title.as_str())
            };
            let node = coordinator.create_group(input).await?;

            match format {
                OutputFormat::Json => output::print_json(&node),
                OutputFormat::Table => {
                    output::print_kv("id", &node.id.to_string());
                    output::print_kv("idKey", &node.id_key);
                    output::print_kv("type", node.kind.as_str());
                }
            }
        }
    }

    Ok(())
}
