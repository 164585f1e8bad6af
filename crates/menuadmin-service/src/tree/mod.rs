//! The menu tree snapshot, its store, and sibling-order resolution.

pub mod arena;
pub mod order;
pub mod store;

pub use arena::MenuTree;
pub use order::{ReorderPlan, SiblingOrderResolver};
pub use store::MenuTreeStore;
