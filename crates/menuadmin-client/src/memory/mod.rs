//! In-process menu-admin backend.

mod state;
pub mod store;

pub use store::{ApiCall, InMemoryMenuApi};
