//! CLI command definitions and dispatch.

pub mod group;
pub mod item;
pub mod node;
pub mod role;
pub mod tree;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use menuadmin_core::config::AppConfig;
use menuadmin_core::error::AppError;
use menuadmin_core::traits::{MenuApi, Notifier};
use menuadmin_service::{MenuTreeStore, TreeMutationCoordinator};

use crate::notify::ConsoleNotifier;
use crate::output::OutputFormat;

/// menu-admin: manage the navigation menu tree and role permissions
#[derive(Debug, Parser)]
#[command(name = "menu-admin", version, about, long_about = None)]
pub struct Cli {
    /// Path to an extra configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the menu tree
    Tree(tree::TreeArgs),
    /// Group and collapse nodes
    Group(group::GroupArgs),
    /// Item nodes
    Item(item::ItemArgs),
    /// Update, delete, move or reorder any node
    Node(node::NodeArgs),
    /// Role menu permissions
    Role(role::RoleArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        let ctx = Context::connect(config)?;
        match &self.command {
            Commands::Tree(args) => tree::execute(args, &ctx, self.format).await,
            Commands::Group(args) => group::execute(args, &ctx, self.format).await,
            Commands::Item(args) => item::execute(args, &ctx, self.format).await,
            Commands::Node(args) => node::execute(args, &ctx, self.format).await,
            Commands::Role(args) => role::execute(args, &ctx, self.format).await,
        }
    }
}

/// Shared services for one command invocation.
pub struct Context {
    /// Remote API.
    pub api: Arc<dyn MenuApi>,
    /// Terminal notifier.
    pub notifier: Arc<dyn Notifier>,
    /// Tree snapshot holder.
    pub store: Arc<MenuTreeStore>,
}

impl Context {
    fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let api = menuadmin_client::connect(&config.api)?;
        let store = Arc::new(MenuTreeStore::new(Arc::clone(&api)));
        Ok(Self {
            api,
            notifier: Arc::new(ConsoleNotifier),
            store,
        })
    }

    /// Load the tree and build a coordinator over it.
    pub async fn coordinator(&self) -> Result<TreeMutationCoordinator, AppError> {
        self.store.reload().await?;
        Ok(TreeMutationCoordinator::new(
            Arc::clone(&self.api),
            Arc::clone(&self.store),
            Arc::clone(&self.notifier),
        ))
    }
}

/// Helper: load configuration. `MENUADMIN_ENV` selects the overlay file.
pub fn load_config(explicit: Option<&str>) -> Result<AppConfig, AppError> {
    let env = std::env::var("MENUADMIN_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env, explicit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use menuadmin_core::types::MenuId;

    #[test]
    fn test_parse_node_delete() {
        let cli = Cli::try_parse_from(["menu-admin", "node", "delete", "7", "--hard", "--yes"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Node(node::NodeArgs {
                command: node::NodeCommand::Delete {
                    id: MenuId(7),
                    hard: true,
                    yes: true,
                },
            })
        ));
    }

    #[test]
    fn test_move_target_flags_conflict() {
        let result = Cli::try_parse_from([
            "menu-admin", "node", "move", "7", "--parent-id", "1", "--root",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_is_global() {
        let cli = Cli::try_parse_from(["menu-admin", "tree", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_grant_requires_menu_ids() {
        assert!(Cli::try_parse_from(["menu-admin", "role", "grant", "3"]).is_err());
        assert!(Cli::try_parse_from(["menu-admin", "role", "grant", "3", "10", "11"]).is_ok());
    }
}
