//! Sibling position resolution for reorder requests.

use serde::Serialize;

use menuadmin_core::error::AppError;
use menuadmin_core::result::AppResult;
use menuadmin_core::types::MenuId;

use super::arena::MenuTree;

/// A reorder request after clamping, ready to be sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReorderPlan {
    /// The node being moved.
    pub node_id: MenuId,
    /// Its parent, `None` when reordering root groups.
    pub parent_id: Option<MenuId>,
    /// Position the operator asked for.
    pub requested: i32,
    /// Clamped position to send.
    pub position: i32,
    /// Number of siblings, including the node itself.
    pub sibling_count: usize,
    /// Current 1-based position of the node.
    pub current_position: i32,
}

impl ReorderPlan {
    /// Whether the requested position had to be clamped.
    pub fn was_clamped(&self) -> bool {
        self.requested != self.position
    }
}

/// Computes target sibling positions for reorder requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiblingOrderResolver;

impl SiblingOrderResolver {
    /// Clamp a 1-based position into `[1, max(sibling_count, 1)]`.
    pub fn clamp(requested: i32, sibling_count: usize) -> i32 {
        let max = i32::try_from(sibling_count).unwrap_or(i32::MAX).max(1);
        requested.clamp(1, max)
    }

    /// Resolve a reorder request against the current tree.
    ///
    /// The sibling list is the children of `parent_id`, or the root list
    /// when no parent is given. The node must currently sit in that list.
    pub fn resolve(
        tree: &MenuTree,
        node_id: MenuId,
        parent_id: Option<MenuId>,
        requested: i32,
    ) -> AppResult<ReorderPlan> {
        if !tree.contains(node_id) {
            return Err(AppError::not_found(format!("Menu node {node_id} not found")));
        }

        let siblings = match parent_id {
            Some(parent) => {
                if !tree.contains(parent) {
                    return Err(AppError::not_found(format!("Parent node {parent} not found")));
                }
                tree.children_of(parent)
            }
            None => tree.roots(),
        };

        let current = siblings.iter().position(|s| *s == node_id).ok_or_else(|| {
            let scope = match parent_id {
                Some(parent) => format!("a child of {parent}"),
                None => "a root node".to_string(),
            };
            AppError::field("parentId", format!("Menu node {node_id} is not {scope}"))
        })?;

        Ok(ReorderPlan {
            node_id,
            parent_id,
            requested,
            position: Self::clamp(requested, siblings.len()),
            sibling_count: siblings.len(),
            current_position: current as i32 + 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use menuadmin_core::types::{MenuNode, MenuTreeNode};

    fn tree() -> MenuTree {
        MenuTree::from_forest(vec![
            MenuTreeNode::with_children(
                MenuNode::group(1, "ventas", "Ventas"),
                vec![
                    MenuTreeNode::leaf(MenuNode::item(2, "a", "A", "/ventas/a")),
                    MenuTreeNode::leaf(MenuNode::item(3, "b", "B", "/ventas/b")),
                    MenuTreeNode::leaf(MenuNode::item(4, "c", "C", "/ventas/c")),
                ],
            ),
            MenuTreeNode::leaf(MenuNode::group(5, "admin", "Admin")),
        ])
        .unwrap()
    }

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(SiblingOrderResolver::clamp(0, 3), 1);
        assert_eq!(SiblingOrderResolver::clamp(4, 3), 3);
        assert_eq!(SiblingOrderResolver::clamp(-7, 3), 1);
        assert_eq!(SiblingOrderResolver::clamp(2, 3), 2);
        assert_eq!(SiblingOrderResolver::clamp(5, 0), 1);
    }

    #[test]
    fn test_resolve_child() {
        let plan = SiblingOrderResolver::resolve(&tree(), MenuId(3), Some(MenuId(1)), 9).unwrap();
        assert_eq!(plan.position, 3);
        assert_eq!(plan.sibling_count, 3);
        assert_eq!(plan.current_position, 2);
        assert!(plan.was_clamped());
    }

    #[test]
    fn test_resolve_root() {
        let plan = SiblingOrderResolver::resolve(&tree(), MenuId(5), None, 0).unwrap();
        assert_eq!(plan.position, 1);
        assert_eq!(plan.current_position, 2);
    }

    #[test]
    fn test_resolve_wrong_parent() {
        let err = SiblingOrderResolver::resolve(&tree(), MenuId(2), None, 1).unwrap_err();
        assert_eq!(err.kind, menuadmin_core::ErrorKind::Validation);

        let err = SiblingOrderResolver::resolve(&tree(), MenuId(99), None, 1).unwrap_err();
        assert_eq!(err.kind, menuadmin_core::ErrorKind::NotFound);
    }
}
