//! Core traits defined in `menuadmin-core` and implemented by other crates.

pub mod menu_api;
pub mod notifier;

pub use menu_api::MenuApi;
pub use notifier::{Notice, NoticeLevel, Notifier, TracingNotifier};
