//! Flattening of a propagated role tree into persisted ids.

use menuadmin_core::types::MenuId;

use super::tree::RoleMenuTree;

/// Collects the ids of every assigned node, groups included.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignedIdExtractor;

impl AssignedIdExtractor {
    /// Ids of all assigned nodes in depth-first display order.
    pub fn extract(tree: &RoleMenuTree) -> Vec<MenuId> {
        tree.pre_order()
            .into_iter()
            .map(|slot| &tree.entries[slot])
            .filter(|entry| entry.assigned)
            .map(|entry| entry.node.id)
            .collect()
    }
}
