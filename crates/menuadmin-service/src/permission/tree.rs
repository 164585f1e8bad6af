//! Arena projection of the menu forest carrying a role's `assigned` flags.

use std::collections::HashMap;

use menuadmin_core::error::AppError;
use menuadmin_core::result::AppResult;
use menuadmin_core::types::{MenuId, MenuNode, RoleMenuItem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RoleEntry {
    pub(crate) node: MenuNode,
    pub(crate) assigned: bool,
    pub(crate) children: Vec<usize>,
}

/// A role's view of the menu forest.
///
/// Entries live in a flat vector; children are indices into it. A
/// post-order index (children before parents) is computed once at build
/// time so bottom-up passes are a single linear scan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleMenuTree {
    pub(crate) entries: Vec<RoleEntry>,
    pub(crate) index: HashMap<MenuId, usize>,
    pub(crate) roots: Vec<usize>,
    pub(crate) post_order: Vec<usize>,
}

impl RoleMenuTree {
    /// Build from the forest returned by `getRoleMenus`.
    pub fn from_items(items: Vec<RoleMenuItem>) -> AppResult<Self> {
        let mut tree = Self::default();
        let mut pending: Vec<(Option<usize>, RoleMenuItem)> =
            items.into_iter().rev().map(|item| (None, item)).collect();

        while let Some((parent, item)) = pending.pop() {
            let RoleMenuItem {
                node,
                assigned,
                children,
            } = item;
            let id = node.id;
            let slot = tree.entries.len();

            if tree.index.insert(id, slot).is_some() {
                return Err(AppError::validation(format!(
                    "Menu node {id} appears more than once in the role tree"
                )));
            }
            tree.entries.push(RoleEntry {
                node,
                assigned,
                children: Vec::with_capacity(children.len()),
            });
            match parent {
                Some(p) => tree.entries[p].children.push(slot),
                None => tree.roots.push(slot),
            }

            pending.extend(children.into_iter().rev().map(|c| (Some(slot), c)));
        }

        tree.post_order = tree.compute_post_order();
        Ok(tree)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the node exists.
    pub fn contains(&self, id: MenuId) -> bool {
        self.index.contains_key(&id)
    }

    /// The `assigned` flag of a node.
    pub fn is_assigned(&self, id: MenuId) -> Option<bool> {
        self.index.get(&id).map(|slot| self.entries[*slot].assigned)
    }

    /// The menu node behind an id.
    pub fn node(&self, id: MenuId) -> Option<&MenuNode> {
        self.index.get(&id).map(|slot| &self.entries[*slot].node)
    }

    /// Child ids of a node.
    pub fn children_of(&self, id: MenuId) -> Vec<MenuId> {
        self.index
            .get(&id)
            .map(|slot| {
                self.entries[*slot]
                    .children
                    .iter()
                    .map(|c| self.entries[*c].node.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Slots in pre-order (parents before children, siblings in order).
    pub(crate) fn pre_order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.entries.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(slot) = stack.pop() {
            out.push(slot);
            stack.extend(self.entries[slot].children.iter().rev().copied());
        }
        out
    }

    fn compute_post_order(&self) -> Vec<usize> {
        let mut out = self.pre_order();
        // Reversed pre-order visits every child before its parent.
        out.reverse();
        out
    }

    /// Rebuild the nested forest representation.
    pub fn to_items(&self) -> Vec<RoleMenuItem> {
        self.roots.iter().map(|slot| self.item_at(*slot)).collect()
    }

    fn item_at(&self, slot: usize) -> RoleMenuItem {
        let entry = &self.entries[slot];
        RoleMenuItem::with_children(
            entry.node.clone(),
            entry.assigned,
            entry.children.iter().map(|c| self.item_at(*c)).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_items_indexes_nodes() {
        let tree = RoleMenuTree::from_items(vec![RoleMenuItem::with_children(
            MenuNode::group(1, "ventas", "Ventas"),
            true,
            vec![
                RoleMenuItem::leaf(MenuNode::item(2, "reporte", "Reporte", "/ventas/reporte"), true),
                RoleMenuItem::leaf(MenuNode::item(3, "historial", "Historial", "/ventas/historial"), false),
            ],
        )])
        .unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.is_assigned(MenuId(3)), Some(false));
        assert_eq!(tree.children_of(MenuId(1)), vec![MenuId(2), MenuId(3)]);
        assert_eq!(tree.is_assigned(MenuId(9)), None);

        let position = |id: i64| {
            tree.post_order
                .iter()
                .position(|s| tree.entries[*s].node.id == MenuId(id))
                .unwrap()
        };
        assert!(position(2) < position(1));
        assert!(position(3) < position(1));
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = RoleMenuTree::from_items(vec![
            RoleMenuItem::leaf(MenuNode::group(1, "a", "A"), false),
            RoleMenuItem::leaf(MenuNode::group(1, "a", "A"), false),
        ]);
        assert!(result.is_err());
    }
}
