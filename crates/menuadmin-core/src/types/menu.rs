//! Menu data model as exchanged with the menu-admin API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::id::MenuId;
use crate::error::AppError;

/// The three kinds of menu node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuKind {
    /// Top-level navigation group.
    Group,
    /// Collapsible section; structurally identical to a group.
    Collapse,
    /// Leaf entry carrying a navigable URL.
    Item,
}

impl MenuKind {
    /// Whether nodes of this kind may have children.
    pub fn is_container(&self) -> bool {
        match self {
            Self::Group | Self::Collapse => true,
            Self::Item => false,
        }
    }

    /// Return the kind as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Collapse => "collapse",
            Self::Item => "item",
        }
    }
}

impl fmt::Display for MenuKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MenuKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "group" => Ok(Self::Group),
            "collapse" => Ok(Self::Collapse),
            "item" => Ok(Self::Item),
            _ => Err(AppError::validation(format!(
                "Invalid menu kind: '{s}'. Expected one of: group, collapse, item"
            ))),
        }
    }
}

/// A single menu node. Parent/child relationships are not stored here;
/// they live in [`Edge`] records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuNode {
    /// Backend identifier.
    pub id: MenuId,
    /// Stable key: lowercase, no whitespace, unique. Immutable after creation.
    pub id_key: String,
    /// Display title.
    pub title: String,
    /// Node kind.
    #[serde(rename = "type", alias = "kind")]
    pub kind: MenuKind,
    /// Navigation target (items only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Icon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Secondary caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// 1-based position among siblings.
    #[serde(default = "default_order")]
    pub order: i32,
    /// Whether the node is shown to end users.
    #[serde(default = "default_true")]
    pub active: bool,
}

impl MenuNode {
    /// Build a group node with default presentation fields.
    pub fn group(id: i64, id_key: &str, title: &str) -> Self {
        Self::bare(MenuId(id), id_key, title, MenuKind::Group, None)
    }

    /// Build a collapse node with default presentation fields.
    pub fn collapse(id: i64, id_key: &str, title: &str) -> Self {
        Self::bare(MenuId(id), id_key, title, MenuKind::Collapse, None)
    }

    /// Build an item node.
    pub fn item(id: i64, id_key: &str, title: &str, url: &str) -> Self {
        Self::bare(MenuId(id), id_key, title, MenuKind::Item, Some(url.to_string()))
    }

    fn bare(id: MenuId, id_key: &str, title: &str, kind: MenuKind, url: Option<String>) -> Self {
        Self {
            id,
            id_key: id_key.to_string(),
            title: title.to_string(),
            kind,
            url,
            icon: None,
            caption: None,
            order: 1,
            active: true,
        }
    }

    /// Set the sibling order.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Whether this node is a leaf item.
    pub fn is_item(&self) -> bool {
        !self.kind.is_container()
    }
}

/// A node of the nested forest returned by `getTree()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuTreeNode {
    /// The node itself.
    #[serde(flatten)]
    pub node: MenuNode,
    /// Child nodes in sibling order.
    #[serde(default)]
    pub children: Vec<MenuTreeNode>,
}

impl MenuTreeNode {
    /// Wrap a node without children.
    pub fn leaf(node: MenuNode) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    /// Wrap a node with the given children.
    pub fn with_children(node: MenuNode, children: Vec<MenuTreeNode>) -> Self {
        Self { node, children }
    }
}

/// A persisted parent → child relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Parent node.
    pub parent_id: MenuId,
    /// Child node.
    pub child_id: MenuId,
    /// 1-based position of the child among the parent's children.
    pub order: i32,
}

/// Payload of `createGroup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroup {
    /// Normalized id key.
    pub id_key: String,
    /// Display title.
    pub title: String,
    /// `Group` or `Collapse`.
    #[serde(rename = "type")]
    pub kind: MenuKind,
    /// Icon name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Secondary caption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Requested root position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Initial visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Payload of `createItem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    /// Normalized id key.
    pub id_key: String,
    /// Display title.
    pub title: String,
    /// Always `Item`.
    #[serde(rename = "type")]
    pub kind: MenuKind,
    /// Derived URL (`/{parentIdKey}/{idKey}`).
    pub url: String,
    /// Icon name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Secondary caption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Whether the URL points outside the console.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external: Option<bool>,
    /// Open in a new browser tab.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_blank: Option<bool>,
    /// Show breadcrumbs on the target page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breadcrumbs: Option<bool>,
    /// Requested root position (parentless items only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Initial visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Parent node the item is attached to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<MenuId>,
    /// Requested position among the parent's children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_order: Option<i32>,
}

/// Partial update of the editable fields of a node.
///
/// Absent fields are left untouched by the backend. `id_key` is not
/// editable and therefore not part of the patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// New icon (empty string clears it).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// New caption (empty string clears it).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// New sibling order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

impl NodePatch {
    /// Whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.icon.is_none()
            && self.caption.is_none()
            && self.order.is_none()
    }
}

fn default_order() -> i32 {
    1
}

fn default_true() -> bool {
    true
}
