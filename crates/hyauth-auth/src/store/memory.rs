//! In-memory account store.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::AuthError;
use crate::record::AccountRecord;
use crate::snapshot::Snapshot;

use super::AccountStore;

/// Store backed by a snapshot held in process memory.
///
/// Useful for tests and for embedding the engine where accounts are
/// managed by the host program. Uses `parking_lot::RwLock` which doesn't
/// poison on panic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RwLock<Arc<Snapshot>>,
}

impl MemoryStore {
    /// Create a store serving the given snapshot.
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            accounts: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Create from `(identity, record)` pairs.
    ///
    /// # Example
    /// ```
    /// use hyauth_auth::{AccountRecord, MemoryStore};
    ///
    /// let store = MemoryStore::from_accounts([
    ///     ("alice", AccountRecord::new("pw1")),
    ///     ("bob", AccountRecord::new("pw2")),
    /// ]);
    /// ```
    pub fn from_accounts<I, K>(accounts: I) -> Self
    where
        I: IntoIterator<Item = (K, AccountRecord)>,
        K: Into<String>,
    {
        Self::new(accounts.into_iter().collect())
    }

    /// Replace the served snapshot; takes effect on the next load.
    pub fn replace(&self, snapshot: Snapshot) {
        *self.accounts.write() = Arc::new(snapshot);
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn load_all(&self) -> Result<Snapshot, AuthError> {
        let current = self.accounts.read().clone();
        Ok(Snapshot::clone(&current))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
