//! Cascade-down / infer-up propagation of role assignments.

use tracing::debug;

use menuadmin_core::types::MenuId;

use super::tree::RoleMenuTree;

/// Keeps a role tree self-consistent after a single checkbox toggle.
///
/// Two passes run on every toggle:
///
/// 1. **Cascade.** The target and its whole subtree are set to `checked`,
///    overwriting any mixed state below it.
/// 2. **Inference.** Every node with children is recomputed, bottom-up, as
///    the OR of its children. Childless nodes keep their flag.
///
/// A group therefore cannot stay checked once all of its descendants are
/// unchecked, and checking any descendant re-checks every ancestor. The
/// result depends only on `(tree, target, checked)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolePermissionPropagator;

impl RolePermissionPropagator {
    /// Return a new tree with the toggle applied.
    pub fn propagate(tree: &RoleMenuTree, target: MenuId, checked: bool) -> RoleMenuTree {
        let mut next = tree.clone();
        Self::apply(&mut next, target, checked);
        next
    }

    /// Apply the toggle in place. Returns whether `target` was found; the
    /// inference pass runs either way.
    pub fn apply(tree: &mut RoleMenuTree, target: MenuId, checked: bool) -> bool {
        let found = Self::cascade(tree, target, checked);
        if !found {
            debug!(node_id = %target, "Toggled menu node is not in the role tree");
        }
        Self::infer(tree);
        found
    }

    fn cascade(tree: &mut RoleMenuTree, target: MenuId, checked: bool) -> bool {
        let Some(&start) = tree.index.get(&target) else {
            return false;
        };

        let mut stack = vec![start];
        while let Some(slot) = stack.pop() {
            let entry = &mut tree.entries[slot];
            entry.assigned = checked;
            stack.extend(entry.children.iter().copied());
        }
        true
    }

    fn infer(tree: &mut RoleMenuTree) {
        for i in 0..tree.post_order.len() {
            let slot = tree.post_order[i];
            if tree.entries[slot].children.is_empty() {
                continue;
            }
            let any = tree.entries[slot]
                .children
                .iter()
                .any(|c| tree.entries[*c].assigned);
            tree.entries[slot].assigned = any;
        }
    }
}
