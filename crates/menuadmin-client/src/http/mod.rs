//! REST implementation of the menu-admin API.

pub mod client;
pub mod envelope;

pub use client::HttpMenuApi;
pub use envelope::{ApiEnvelope, error_for_status};
