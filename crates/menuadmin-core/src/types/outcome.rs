//! Result bodies of the mutating menu-admin API calls.

use serde::{Deserialize, Serialize};

/// Result of `deleteNode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    /// Whether a node was deleted.
    pub deleted: bool,
}

/// Result of `addEdge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeCreated {
    /// Whether a new edge was recorded.
    pub created: bool,
}

/// Result of `removeEdge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRemoved {
    /// Whether an edge was removed.
    pub deleted: bool,
}

/// Result of `reorderChild`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildReorder {
    /// Position the backend actually applied.
    pub effective_order: i32,
    /// Number of siblings after the reorder.
    pub max_order: i32,
    /// Advisory message, shown to the operator verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of `reorderRootGroup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootReorder {
    /// Position the backend actually applied.
    pub effective_order: i32,
    /// Number of root nodes.
    pub max_order: i32,
    /// Position that was requested.
    pub target_order: i32,
    /// Position before the reorder.
    pub current_order: i32,
    /// Advisory message, shown to the operator verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
