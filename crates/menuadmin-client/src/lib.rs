//! # menuadmin-client
//!
//! Implementations of [`MenuApi`](menuadmin_core::traits::MenuApi):
//!
//! - [`HttpMenuApi`]: the REST backend, over reqwest.
//! - [`InMemoryMenuApi`]: a local backend applying the same ordering and
//!   single-parent rules, for offline use and tests.

pub mod http;
pub mod memory;
pub mod provider;

pub use http::HttpMenuApi;
pub use memory::{ApiCall, InMemoryMenuApi};
pub use provider::connect;
