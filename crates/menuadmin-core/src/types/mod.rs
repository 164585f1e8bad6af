//! Shared types: typed identifiers, the menu data model exchanged with the
//! menu-admin API, and the result envelopes of its mutating calls.

pub mod id;
pub mod menu;
pub mod outcome;
pub mod role;

pub use id::{MenuId, RoleId};
pub use menu::{CreateGroup, CreateItem, Edge, MenuKind, MenuNode, MenuTreeNode, NodePatch};
pub use outcome::{ChildReorder, DeleteOutcome, EdgeCreated, EdgeRemoved, RootReorder};
pub use role::RoleMenuItem;
