//! Role-permission projection of the menu tree.

use serde::{Deserialize, Serialize};

use super::menu::MenuNode;

/// A node of the tree returned by `getRoleMenus(roleId)`, pre-annotated
/// with whether the role currently has the node assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMenuItem {
    /// The menu node.
    #[serde(flatten)]
    pub node: MenuNode,
    /// Whether the role has this node assigned.
    #[serde(default)]
    pub assigned: bool,
    /// Child nodes in sibling order.
    #[serde(default)]
    pub children: Vec<RoleMenuItem>,
}

impl RoleMenuItem {
    /// Wrap a node without children.
    pub fn leaf(node: MenuNode, assigned: bool) -> Self {
        Self {
            node,
            assigned,
            children: Vec::new(),
        }
    }

    /// Wrap a node with the given children.
    pub fn with_children(node: MenuNode, assigned: bool, children: Vec<RoleMenuItem>) -> Self {
        Self {
            node,
            assigned,
            children,
        }
    }
}
