//! Menu-admin API connection configuration.

use serde::{Deserialize, Serialize};

/// Which [`MenuApi`](crate::traits::MenuApi) implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiProvider {
    /// REST backend over HTTP.
    Http,
    /// Local in-process backend (no persistence).
    Memory,
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend implementation.
    #[serde(default = "default_provider")]
    pub provider: ApiProvider,
    /// Base URL of the REST backend, e.g. `http://localhost:8080/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Session cookie forwarded on every request (`name=value`).
    #[serde(default)]
    pub session_cookie: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            session_cookie: None,
        }
    }
}

fn default_provider() -> ApiProvider {
    ApiProvider::Http
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout() -> u64 {
    30
}
