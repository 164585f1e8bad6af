//! # menuadmin-core
//!
//! Core crate for the menu administration engine. Contains the remote
//! collaborator traits, configuration schemas, typed identifiers, the
//! wire-level result types returned by the menu-admin API, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other menu-admin crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
