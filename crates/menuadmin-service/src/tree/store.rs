//! Holder of the last menu tree fetched from the backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use menuadmin_core::error::AppError;
use menuadmin_core::result::AppResult;
use menuadmin_core::traits::MenuApi;

use super::arena::MenuTree;

#[derive(Debug)]
struct StoreState {
    snapshot: Arc<MenuTree>,
    loading: bool,
    last_error: Option<AppError>,
    loaded_at: Option<DateTime<Utc>>,
    /// Ticket of the reload whose result is currently applied.
    applied_ticket: u64,
}

/// The single source of truth for the menu tree on the client side.
///
/// The snapshot is never patched locally. [`reload`](Self::reload) fetches
/// the whole forest and swaps the `Arc`, so readers holding the previous
/// snapshot keep a consistent tree.
#[derive(Debug)]
pub struct MenuTreeStore {
    /// Remote API.
    api: Arc<dyn MenuApi>,
    /// Snapshot and status flags.
    state: RwLock<StoreState>,
    /// Monotonic reload ticket.
    next_ticket: AtomicU64,
}

impl MenuTreeStore {
    /// Creates an empty store. Call [`reload`](Self::reload) to populate it.
    pub fn new(api: Arc<dyn MenuApi>) -> Self {
        Self {
            api,
            state: RwLock::new(StoreState {
                snapshot: Arc::new(MenuTree::empty()),
                loading: false,
                last_error: None,
                loaded_at: None,
                applied_ticket: 0,
            }),
            next_ticket: AtomicU64::new(1),
        }
    }

    /// The current snapshot.
    pub async fn snapshot(&self) -> Arc<MenuTree> {
        Arc::clone(&self.state.read().await.snapshot)
    }

    /// Whether a reload is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Error of the most recent failed reload, cleared by a successful one.
    pub async fn last_error(&self) -> Option<AppError> {
        self.state.read().await.last_error.clone()
    }

    /// When the current snapshot was fetched.
    pub async fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.loaded_at
    }

    /// Fetch the full tree and replace the snapshot.
    ///
    /// On failure the previous snapshot stays in place and the error is
    /// recorded. When reloads overlap, a response never overwrites the
    /// result of a reload that was started later.
    pub async fn reload(&self) -> AppResult<Arc<MenuTree>> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst);
        self.state.write().await.loading = true;

        let fetched = match self.api.get_tree().await {
            Ok(forest) => MenuTree::from_forest(forest),
            Err(e) => Err(e),
        };

        let mut state = self.state.write().await;
        let newest = ticket > state.applied_ticket;
        if ticket + 1 == self.next_ticket.load(Ordering::SeqCst) {
            state.loading = false;
        }

        match fetched {
            Ok(tree) => {
                if newest {
                    debug!(nodes = tree.len(), ticket, "Menu tree reloaded");
                    state.snapshot = Arc::new(tree);
                    state.applied_ticket = ticket;
                    state.last_error = None;
                    state.loaded_at = Some(Utc::now());
                }
                Ok(Arc::clone(&state.snapshot))
            }
            Err(e) => {
                warn!(error = %e, ticket, "Menu tree reload failed");
                if newest {
                    state.last_error = Some(e.clone());
                }
                Err(e)
            }
        }
    }
}
