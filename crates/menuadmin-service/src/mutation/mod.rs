//! Structural mutation of the menu tree.

pub mod busy;
pub mod coordinator;
pub mod diff;
pub mod draft;

pub use busy::{BusyGuard, BusyTokens};
pub use coordinator::{
    GroupInput, ItemInput, MoveOutcome, ReorderOutcome, TreeMutationCoordinator, UpdateOutcome,
};
pub use diff::minimal_diff;
pub use draft::{CoordinatorState, NodeDraft, derive_item_url, normalize_id_key};
