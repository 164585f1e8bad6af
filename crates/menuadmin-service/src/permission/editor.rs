//! Editing session for one role's menu permissions.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use menuadmin_core::error::{AppError, ErrorKind};
use menuadmin_core::result::AppResult;
use menuadmin_core::traits::{MenuApi, Notice, Notifier};
use menuadmin_core::types::{MenuId, RoleId, RoleMenuItem};

use super::extractor::AssignedIdExtractor;
use super::propagator::RolePermissionPropagator;
use super::tree::RoleMenuTree;

/// A role's permission tree, opened for editing.
///
/// The tree is transient: it is built when the editor opens, replaced on
/// every toggle, and the full assigned-id set is recomputed on save.
#[derive(Debug)]
pub struct RolePermissionEditor {
    /// Remote API.
    api: Arc<dyn MenuApi>,
    /// Operator notifications.
    notifier: Arc<dyn Notifier>,
    /// Role being edited.
    role_id: RoleId,
    /// Current propagated tree.
    tree: RoleMenuTree,
    /// Set while a save is in flight.
    saving: AtomicBool,
}

impl RolePermissionEditor {
    /// Load a role's menu tree and open it for editing.
    pub async fn open(
        api: Arc<dyn MenuApi>,
        notifier: Arc<dyn Notifier>,
        role_id: RoleId,
    ) -> AppResult<Self> {
        let items = match api.get_role_menus(role_id).await {
            Ok(items) => items,
            Err(e) => {
                report(notifier.as_ref(), &e, "Failed to load role menus");
                return Err(e);
            }
        };
        let tree = RoleMenuTree::from_items(items)?;
        info!(role_id = %role_id, nodes = tree.len(), "Role permission editor opened");

        Ok(Self {
            api,
            notifier,
            role_id,
            tree,
            saving: AtomicBool::new(false),
        })
    }

    /// The role being edited.
    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// The current tree.
    pub fn tree(&self) -> &RoleMenuTree {
        &self.tree
    }

    /// The current tree as a nested forest.
    pub fn items(&self) -> Vec<RoleMenuItem> {
        self.tree.to_items()
    }

    /// Toggle a node and propagate the change through the tree.
    ///
    /// Returns whether the node exists in the tree.
    pub fn toggle(&mut self, id: MenuId, checked: bool) -> bool {
        let next = RolePermissionPropagator::propagate(&self.tree, id, checked);
        let found = next.contains(id);
        self.tree = next;
        found
    }

    /// Ids that would be persisted right now.
    pub fn assigned_ids(&self) -> Vec<MenuId> {
        AssignedIdExtractor::extract(&self.tree)
    }

    /// Whether a save is in flight.
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    /// Persist the assigned ids for the role.
    pub async fn save(&self) -> AppResult<Vec<MenuId>> {
        if self.saving.swap(true, Ordering::SeqCst) {
            let err = AppError::busy(format!("Role {} is already being saved", self.role_id));
            self.notifier.notify(Notice::error(err.message.clone()));
            return Err(err);
        }

        let ids = self.assigned_ids();
        let result = self.api.save_role_menus(self.role_id, &ids).await;
        self.saving.store(false, Ordering::SeqCst);

        match result {
            Ok(()) => {
                info!(role_id = %self.role_id, assigned = ids.len(), "Role menus saved");
                self.notifier.notify(Notice::success("Role permissions saved"));
                Ok(ids)
            }
            Err(e) => {
                report(self.notifier.as_ref(), &e, "Failed to save role permissions");
                Err(e)
            }
        }
    }
}

fn report(notifier: &dyn Notifier, err: &AppError, context: &str) {
    warn!(error = %err, "{context}");
    match err.kind {
        ErrorKind::Authentication => notifier.on_unauthorized(),
        ErrorKind::Authorization => notifier.on_forbidden(),
        _ => notifier.notify(Notice::error(format!("{context}: {}", err.message))),
    }
}
