//! Per-node busy tokens.

use std::sync::Arc;

use dashmap::DashSet;

use menuadmin_core::error::AppError;
use menuadmin_core::result::AppResult;
use menuadmin_core::types::MenuId;

/// Set of nodes with a mutation in flight.
///
/// Acquiring a token for a node that already holds one fails with a
/// `Busy` error; other nodes are unaffected.
#[derive(Debug, Clone, Default)]
pub struct BusyTokens {
    inner: Arc<DashSet<MenuId>>,
}

impl BusyTokens {
    /// Creates an empty token set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` busy until the returned guard is dropped.
    pub fn acquire(&self, id: MenuId) -> AppResult<BusyGuard> {
        if !self.inner.insert(id) {
            return Err(AppError::busy(format!(
                "Another action on menu node {id} is still in progress"
            )));
        }
        Ok(BusyGuard {
            id,
            inner: Arc::clone(&self.inner),
        })
    }

    /// Whether `id` has a mutation in flight.
    pub fn is_busy(&self, id: MenuId) -> bool {
        self.inner.contains(&id)
    }
}

/// Releases a node's busy token on drop.
#[derive(Debug)]
pub struct BusyGuard {
    id: MenuId,
    inner: Arc<DashSet<MenuId>>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.inner.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_is_exclusive_per_node() {
        let tokens = BusyTokens::new();
        let guard = tokens.acquire(MenuId(1)).unwrap();
        assert!(tokens.is_busy(MenuId(1)));
        assert!(tokens.acquire(MenuId(1)).is_err());
        assert!(tokens.acquire(MenuId(2)).is_ok());

        drop(guard);
        assert!(!tokens.is_busy(MenuId(1)));
        assert!(tokens.acquire(MenuId(1)).is_ok());
    }
}
