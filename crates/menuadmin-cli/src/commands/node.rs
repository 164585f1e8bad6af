//! Update, delete, move and reorder commands for any node.

use clap::{Args, Subcommand};

use menuadmin_core::error::AppError;
use menuadmin_core::types::{MenuId, NodePatch};
use menuadmin_service::{MoveOutcome, UpdateOutcome};

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for node commands
#[derive(Debug, Args)]
pub struct NodeArgs {
    /// Node subcommand
    #[command(subcommand)]
    pub command: NodeCommand,
}

/// Node subcommands
#[derive(Debug, Subcommand)]
pub enum NodeCommand {
    /// Change the editable fields of a node; only changed fields are sent
    Update {
        /// Node ID
        id: MenuId,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New URL (items only)
        #[arg(long)]
        url: Option<String>,
        /// New icon; an empty value clears it
        #[arg(long)]
        icon: Option<String>,
        /// New caption; an empty value clears it
        #[arg(long)]
        caption: Option<String>,
        /// New sibling position
        #[arg(long)]
        order: Option<i32>,
    },
    /// Delete a node after confirmation
    Delete {
        /// Node ID
        id: MenuId,
        /// Remove permanently instead of hiding
        #[arg(long)]
        hard: bool,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Attach a node to another parent
    Move {
        /// Node ID
        id: MenuId,
        /// New parent ID
        #[arg(short, long, conflicts_with = "root")]
        parent_id: Option<MenuId>,
        /// Detach the node and leave it at the root
        #[arg(long)]
        root: bool,
    },
    /// Move a node to a position among its siblings (clamped to 1..=N)
    Reorder {
        /// Node ID
        id: MenuId,
        /// 1-based target position
        #[arg(short, long)]
        position: i32,
    },
}

/// Execute node commands
pub async fn execute(args: &NodeArgs, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    let coordinator = ctx.coordinator().await?;

    match &args.command {
        NodeCommand::Update {
            id,
            title,
            url,
            icon,
            caption,
            order,
        } => {
            coordinator.begin_edit(*id).await?;
            let patch = NodePatch {
                title: title.clone(),
                url: url.clone(),
                icon: icon.clone(),
                caption: caption.clone(),
                order: *order,
            };
            if let UpdateOutcome::Updated(node) = coordinator.update_node(*id, patch).await?
                && format == OutputFormat::Json
            {
                output::print_json(&node);
            }
        }
        NodeCommand::Delete { id, hard, yes } => {
            coordinator.request_delete(*id).await?;

            if !yes {
                let title = ctx
                    .store
                    .snapshot()
                    .await
                    .get(*id)
                    .map(|n| n.title.clone())
                    .unwrap_or_default();
                let prompt = if *hard {
                    format!("Permanently delete '{title}' ({id})?")
                } else {
                    format!("Delete '{title}' ({id})?")
                };
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(prompt)
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    coordinator.cancel();
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            coordinator.confirm_delete(*hard).await?;
        }
        NodeCommand::Move {
            id,
            parent_id,
            root,
        } => {
            if parent_id.is_none() && !root {
                return Err(AppError::field("parentId", "Pass --parent-id or --root"));
            }
            coordinator.begin_move(*id).await?;
            let outcome = coordinator.move_node(*id, *parent_id).await?;
            if format == OutputFormat::Json {
                output::print_json(&outcome);
            } else if let MoveOutcome::Moved { attached_to: None, .. } = outcome {
                output::print_success(&format!("Node {id} is now a root node"));
            }
        }
        NodeCommand::Reorder { id, position } => {
            let parent_id = ctx.store.snapshot().await.parent_of(*id);
            coordinator.begin_reorder(*id).await?;
            let outcome = coordinator.reorder(*id, parent_id, *position).await?;
            if format == OutputFormat::Json {
                output::print_json(&outcome);
            } else if outcome.sent != outcome.requested {
                output::print_warning(&format!(
                    "Position {} adjusted to {}",
                    outcome.requested, outcome.sent
                ));
            }
        }
    }

    Ok(())
}
