//! Provider selection from configuration.

use std::sync::Arc;

use tracing::info;

use menuadmin_core::config::api::{ApiConfig, ApiProvider};
use menuadmin_core::result::AppResult;
use menuadmin_core::traits::MenuApi;

use crate::http::HttpMenuApi;
use crate::memory::InMemoryMenuApi;

/// Build the configured [`MenuApi`] implementation.
pub fn connect(config: &ApiConfig) -> AppResult<Arc<dyn MenuApi>> {
    match config.provider {
        ApiProvider::Http => {
            info!(base_url = %config.base_url, "Using HTTP menu API");
            Ok(Arc::new(HttpMenuApi::new(config)?))
        }
        ApiProvider::Memory => {
            info!("Using in-memory menu API");
            Ok(Arc::new(InMemoryMenuApi::new()))
        }
    }
}
