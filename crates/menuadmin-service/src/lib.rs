//! # menuadmin-service
//!
//! Client-side engine for hierarchical menu administration. The
//! [`MenuTreeStore`] holds the last tree fetched from the backend, the
//! [`TreeMutationCoordinator`] drives create/edit/delete/move/reorder
//! intents against the remote API, and the permission module keeps a
//! role's `assigned` flags consistent as the operator toggles them.
//!
//! Services follow constructor injection: the remote API and the notifier
//! are provided at construction time via `Arc` references.

pub mod mutation;
pub mod permission;
pub mod tree;

pub use mutation::{
    BusyTokens, CoordinatorState, GroupInput, ItemInput, MoveOutcome, NodeDraft, ReorderOutcome,
    TreeMutationCoordinator, UpdateOutcome,
};
pub use permission::{
    AssignedIdExtractor, RoleMenuTree, RolePermissionEditor, RolePermissionPropagator,
};
pub use tree::{MenuTree, MenuTreeStore, ReorderPlan, SiblingOrderResolver};
