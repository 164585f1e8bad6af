//! Role-permission editing over the menu tree.

pub mod editor;
pub mod extractor;
pub mod propagator;
pub mod tree;

pub use editor::RolePermissionEditor;
pub use extractor::AssignedIdExtractor;
pub use propagator::RolePermissionPropagator;
pub use tree::RoleMenuTree;
