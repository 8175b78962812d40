//! Credential cache with atomic snapshot replacement.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use tracing::{info, warn};

use crate::error::AuthError;
use crate::record::AccountRecord;
use crate::snapshot::Snapshot;
use crate::store::AccountStore;

/// Holds the most recent account snapshot.
///
/// Uses `ArcSwap` for lock-free reads and atomic replacement: a lookup sees
/// either the old snapshot or the new one in full, never a mix. Store reads
/// happen before the swap, outside any critical section.
///
/// # Example
/// ```
/// use hyauth_auth::{AccountRecord, CredentialCache, Snapshot};
///
/// let cache = CredentialCache::new();
/// assert!(cache.lookup("alice").is_none());
///
/// cache.replace([("alice", AccountRecord::new("pw1"))].into_iter().collect::<Snapshot>());
/// assert!(cache.lookup("alice").is_some());
/// ```
pub struct CredentialCache {
    current: ArcSwap<Snapshot>,
    generation: AtomicU64,
}

impl CredentialCache {
    /// Create a cache holding an empty snapshot.
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::new())
    }

    /// Create a cache seeded with the given snapshot.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            current: ArcSwap::new(Arc::new(snapshot)),
            generation: AtomicU64::new(0),
        }
    }

    /// Build a cache from the first store load.
    ///
    /// If that load fails the cache starts empty and denies everyone until a
    /// later refresh succeeds.
    pub async fn load_initial<S: AccountStore + ?Sized>(store: &S) -> Self {
        let cache = Self::new();
        match cache.refresh(store).await {
            Ok(count) => info!(store = %store.describe(), accounts = count, "initial account snapshot loaded"),
            Err(e) => warn!(
                store = %store.describe(),
                error = %e,
                "initial account load failed, serving empty snapshot"
            ),
        }
        cache
    }

    /// Load a full snapshot from `store` and swap it in.
    ///
    /// On error the current snapshot is left untouched. Returns the number of
    /// accounts in the new snapshot.
    pub async fn refresh<S: AccountStore + ?Sized>(&self, store: &S) -> Result<usize, AuthError> {
        let snapshot = store.load_all().await?;
        let count = snapshot.len();
        self.replace(snapshot);
        Ok(count)
    }

    /// Atomically replace the snapshot.
    pub fn replace(&self, snapshot: Snapshot) {
        self.current.store(Arc::new(snapshot));
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// Get the current snapshot.
    ///
    /// The returned `Arc` stays valid after later refreshes, so one decision
    /// can read several fields from a single consistent view.
    #[inline]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Look up an account in the current snapshot.
    #[inline]
    pub fn lookup(&self, key: &str) -> Option<AccountRecord> {
        self.current.load().get(key).cloned()
    }

    /// Number of accounts in the current snapshot.
    #[inline]
    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    /// Check if the current snapshot has no accounts.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }

    /// Number of successful swaps since creation.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl Default for CredentialCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCache")
            .field("accounts", &self.len())
            .field("generation", &self.generation())
            .finish()
    }
}
