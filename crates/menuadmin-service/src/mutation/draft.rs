//! Coordinator states and the working draft captured on entering them.

use serde::Serialize;

use menuadmin_core::error::FieldErrors;
use menuadmin_core::types::{MenuId, MenuKind, MenuNode};

use crate::tree::MenuTree;

/// The single active state of the mutation coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CoordinatorState {
    /// Nothing in progress.
    Idle,
    /// Creating a group or collapse node.
    CreatingGroup,
    /// Creating an item node.
    CreatingItem,
    /// Editing the given node.
    Editing(MenuNode),
    /// Waiting for the operator to confirm deleting a node.
    ConfirmingDelete {
        /// Node to delete.
        node: MenuNode,
        /// State to return to when the confirmation is cancelled.
        resume: Box<CoordinatorState>,
    },
    /// Choosing a new parent for the node.
    Moving(MenuNode),
    /// Choosing a new sibling position for the node.
    Reordering(MenuNode),
}

impl CoordinatorState {
    /// The node this state targets, if any.
    pub fn target(&self) -> Option<&MenuNode> {
        match self {
            Self::Idle | Self::CreatingGroup | Self::CreatingItem => None,
            Self::Editing(node)
            | Self::Moving(node)
            | Self::Reordering(node)
            | Self::ConfirmingDelete { node, .. } => Some(node),
        }
    }

    /// Whether this state targets `id`, looking through a pending delete
    /// confirmation into the state it would resume.
    pub fn involves(&self, id: MenuId) -> bool {
        match self {
            Self::ConfirmingDelete { node, resume } => node.id == id || resume.involves(id),
            other => other.target().is_some_and(|n| n.id == id),
        }
    }
}

/// Form values for the active state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NodeDraft {
    /// Id key as typed; normalized on submit.
    pub id_key: String,
    /// Title.
    pub title: String,
    /// Kind for new container nodes.
    pub kind: Option<MenuKind>,
    /// Icon name.
    pub icon: String,
    /// Caption.
    pub caption: String,
    /// Selected parent.
    pub parent_id: Option<MenuId>,
    /// URL (derived for new items, editable otherwise).
    pub url: String,
    /// Per-field messages from the last failed submit.
    pub errors: FieldErrors,
}

impl NodeDraft {
    /// Defaults for a new group.
    pub fn for_group() -> Self {
        Self {
            kind: Some(MenuKind::Group),
            ..Self::default()
        }
    }

    /// Defaults for a new item, optionally with a preselected parent.
    pub fn for_item(parent_id: Option<MenuId>) -> Self {
        Self {
            kind: Some(MenuKind::Item),
            parent_id,
            ..Self::default()
        }
    }

    /// Seed from an existing node.
    pub fn from_node(node: &MenuNode, parent_id: Option<MenuId>) -> Self {
        Self {
            id_key: node.id_key.clone(),
            title: node.title.clone(),
            kind: Some(node.kind),
            icon: node.icon.clone().unwrap_or_default(),
            caption: node.caption.clone().unwrap_or_default(),
            parent_id,
            url: node.url.clone().unwrap_or_default(),
            errors: FieldErrors::new(),
        }
    }

    /// URL a new item would get under the selected parent.
    ///
    /// Empty when no parent is selected or the parent is unknown.
    pub fn derived_url(&self, tree: &MenuTree) -> String {
        self.parent_id
            .and_then(|p| tree.get(p))
            .map(|parent| derive_item_url(&parent.id_key, &normalize_id_key(&self.id_key)))
            .unwrap_or_default()
    }

    /// Whether a new item draft has every required field.
    pub fn can_submit_item(&self, tree: &MenuTree) -> bool {
        !normalize_id_key(&self.id_key).is_empty()
            && !self.title.trim().is_empty()
            && self.parent_id.is_some()
            && !self.derived_url(tree).is_empty()
    }
}

/// Lowercase an id key and strip all whitespace.
pub fn normalize_id_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// `/{parentIdKey}/{idKey}`, or `/{parentIdKey}` when the id key is empty.
pub fn derive_item_url(parent_id_key: &str, id_key: &str) -> String {
    if id_key.is_empty() {
        format!("/{parent_id_key}")
    } else {
        format!("/{parent_id_key}/{id_key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use menuadmin_core::types::MenuTreeNode;

    #[test]
    fn test_normalize_id_key() {
        assert_eq!(normalize_id_key("  Mis Ventas\t"), "misventas");
        assert_eq!(normalize_id_key("REPORTE"), "reporte");
        assert_eq!(normalize_id_key("   "), "");
    }

    #[test]
    fn test_derive_item_url() {
        assert_eq!(derive_item_url("ventas", "reporte"), "/ventas/reporte");
        assert_eq!(derive_item_url("ventas", ""), "/ventas");
    }

    #[test]
    fn test_item_draft_submit_gate() {
        let tree = MenuTree::from_forest(vec![MenuTreeNode::leaf(MenuNode::group(
            1, "ventas", "Ventas",
        ))])
        .unwrap();

        let mut draft = NodeDraft::for_item(None);
        draft.id_key = "Reporte Diario".to_string();
        draft.title = "Reporte".to_string();
        assert!(draft.derived_url(&tree).is_empty());
        assert!(!draft.can_submit_item(&tree));

        draft.parent_id = Some(MenuId(1));
        assert_eq!(draft.derived_url(&tree), "/ventas/reportediario");
        assert!(draft.can_submit_item(&tree));

        draft.title = "  ".to_string();
        assert!(!draft.can_submit_item(&tree));
    }

    #[test]
    fn test_involves_looks_through_delete_confirmation() {
        let node = MenuNode::group(1, "ventas", "Ventas");
        let other = MenuNode::group(2, "admin", "Admin");
        let state = CoordinatorState::ConfirmingDelete {
            node: other,
            resume: Box::new(CoordinatorState::Editing(node)),
        };
        assert!(state.involves(MenuId(1)));
        assert!(state.involves(MenuId(2)));
        assert!(!state.involves(MenuId(3)));
    }
}
