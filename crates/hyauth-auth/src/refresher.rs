//! Periodic snapshot refresh task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::CredentialCache;
use crate::store::AccountStore;

/// Handle to a running refresh task.
///
/// Dropping the handle does not stop the task; cancel the token passed to
/// [`spawn_refresher`] instead.
#[derive(Debug)]
pub struct RefreshHandle {
    trigger: Arc<Notify>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Ask the task to reload now without waiting for the next tick.
    pub fn trigger(&self) {
        self.trigger.notify_one();
    }

    /// Get a cloneable trigger for use from other tasks (e.g. a SIGHUP handler).
    pub fn trigger_handle(&self) -> RefreshTrigger {
        RefreshTrigger(self.trigger.clone())
    }

    /// Wait for the task to exit after cancellation.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!(error = %e, "account refresh task panicked");
        }
    }
}

/// Cloneable handle that forces an immediate refresh.
#[derive(Debug, Clone)]
pub struct RefreshTrigger(Arc<Notify>);

impl RefreshTrigger {
    /// Ask the refresh task to reload now.
    pub fn fire(&self) {
        self.0.notify_one();
    }
}

/// Spawn the background task that reloads `cache` from `store` every `period`.
///
/// The first tick fires one `period` after spawning: callers load the initial
/// snapshot synchronously with [`CredentialCache::load_initial`]. Every tick
/// attempts a full reload regardless of earlier failures; there is no backoff.
/// `on_refresh` receives the outcome of each attempt (for metrics).
///
/// Stops when `cancel` is cancelled.
pub fn spawn_refresher<S>(
    cache: Arc<CredentialCache>,
    store: Arc<S>,
    period: Duration,
    cancel: CancellationToken,
    on_refresh: impl Fn(bool) + Send + 'static,
) -> RefreshHandle
where
    S: AccountStore + ?Sized + 'static,
{
    let trigger = Arc::new(Notify::new());
    let notified = trigger.clone();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            store = %store.describe(),
            period_secs = period.as_secs_f64(),
            "starting account refresh task"
        );

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    debug!("account refresh task cancelled");
                    return;
                }
                _ = ticker.tick() => {}
                _ = notified.notified() => {
                    debug!("account refresh triggered");
                }
            }

            match cache.refresh(store.as_ref()).await {
                Ok(count) => {
                    debug!(accounts = count, generation = cache.generation(), "account snapshot refreshed");
                    on_refresh(true);
                }
                Err(e) => {
                    warn!(
                        store = %store.describe(),
                        error = %e,
                        accounts = cache.len(),
                        "account refresh failed, keeping previous snapshot"
                    );
                    on_refresh(false);
                }
            }
        }
    });

    RefreshHandle { trigger, task }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::AuthError;
    use crate::record::AccountRecord;
    use crate::snapshot::Snapshot;
    use crate::store::MemoryStore;

    /// Store that can be switched between failing and serving one account.
    struct FlakyStore {
        failing: AtomicBool,
        loads: AtomicUsize,
    }

    #[async_trait]
    impl AccountStore for FlakyStore {
        async fn load_all(&self) -> Result<Snapshot, AuthError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(AuthError::Backend("down".into()));
            }
            Ok([("alice", AccountRecord::new("pw1"))].into_iter().collect())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_on_fixed_period() {
        let store = Arc::new(MemoryStore::from_accounts([("alice", AccountRecord::new("pw1"))]));
        let cache = Arc::new(CredentialCache::load_initial(store.as_ref()).await);
        let cancel = CancellationToken::new();
        let handle = spawn_refresher(
            cache.clone(),
            store.clone(),
            Duration::from_secs(5),
            cancel.clone(),
            |_| {},
        );

        store.replace([("bob", AccountRecord::new("pw2"))].into_iter().collect());

        // Not yet: the first tick is one period after spawn.
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(cache.lookup("bob").is_none());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(cache.lookup("bob").is_some());
        assert!(cache.lookup("alice").is_none());

        cancel.cancel();
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_without_backoff() {
        let store = Arc::new(FlakyStore {
            failing: AtomicBool::new(true),
            loads: AtomicUsize::new(0),
        });
        let cache = Arc::new(CredentialCache::load_initial(store.as_ref()).await);
        assert!(cache.is_empty());

        let outcomes = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let recorded = outcomes.clone();
        let cancel = CancellationToken::new();
        let handle = spawn_refresher(
            cache.clone(),
            store.clone(),
            Duration::from_secs(5),
            cancel.clone(),
            move |ok| recorded.lock().push(ok),
        );

        tokio::time::sleep(Duration::from_millis(15_500)).await;
        assert_eq!(*outcomes.lock(), vec![false, false, false]);
        assert!(cache.is_empty());

        store.failing.store(false, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(outcomes.lock().last(), Some(&true));
        assert!(cache.lookup("alice").is_some());
        // Initial load plus four ticks.
        assert_eq!(store.loads.load(Ordering::SeqCst), 5);

        cancel.cancel();
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_reloads_immediately() {
        let store = Arc::new(MemoryStore::default());
        let cache = Arc::new(CredentialCache::load_initial(store.as_ref()).await);
        let cancel = CancellationToken::new();
        let handle = spawn_refresher(
            cache.clone(),
            store.clone(),
            Duration::from_secs(3600),
            cancel.clone(),
            |_| {},
        );

        store.replace([("alice", AccountRecord::new("pw1"))].into_iter().collect());
        handle.trigger();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(cache.lookup("alice").is_some());

        store.replace([("bob", AccountRecord::new("pw2"))].into_iter().collect());
        let trigger = handle.trigger_handle();
        tokio::spawn(async move { trigger.fire() }).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(cache.lookup("bob").is_some());

        cancel.cancel();
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_task() {
        let store = Arc::new(FlakyStore {
            failing: AtomicBool::new(false),
            loads: AtomicUsize::new(0),
        });
        let cache = Arc::new(CredentialCache::new());
        let cancel = CancellationToken::new();
        let handle = spawn_refresher(
            cache,
            store.clone(),
            Duration::from_secs(1),
            cancel.clone(),
            |_| {},
        );

        cancel.cancel();
        handle.join().await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(store.loads.load(Ordering::SeqCst), 0);
    }
}
