//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries or
//! sessions. Lazy expiry on read still applies between sweeps.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::cache::CacheLayer;
use crate::error::Result;
use crate::session::SessionStore;
use crate::store::KeyValueStore;

// == Sweep Trait ==
/// A component with a bulk expiry pass.
pub trait Sweep {
    /// Name used in log output.
    const NAME: &'static str;

    /// Removes expired records and returns how many were removed.
    fn sweep(&mut self) -> Result<usize>;
}

impl<S: KeyValueStore> Sweep for CacheLayer<S> {
    const NAME: &'static str = "cache";

    fn sweep(&mut self) -> Result<usize> {
        self.clear_expired()
    }
}

impl<S: KeyValueStore> Sweep for SessionStore<S> {
    const NAME: &'static str = "sessions";

    fn sweep(&mut self) -> Result<usize> {
        self.cleanup_expired_sessions()
    }
}

/// Spawns a background task that periodically sweeps `target`.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. It acquires a write lock on the target for each sweep.
/// A failed sweep is logged and retried on the next tick.
///
/// # Arguments
/// * `target` - Shared reference to the cache layer or session store
/// * `interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(CacheLayer::new(MemoryStore::new(), 300)));
/// let sweep_handle = spawn_sweep_task(cache.clone(), 60);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<T>(target: Arc<RwLock<T>>, interval_secs: u64) -> JoinHandle<()>
where
    T: Sweep + Send + Sync + 'static,
{
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            target_name = T::NAME,
            "Starting expiry sweep task with interval of {} seconds", interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let result = {
                let mut guard = target.write().await;
                guard.sweep()
            };

            match result {
                Ok(0) => debug!(target_name = T::NAME, "Expiry sweep: nothing to remove"),
                Ok(removed) => {
                    info!(target_name = T::NAME, removed, "Expiry sweep removed expired records")
                }
                Err(err) => error!(target_name = T::NAME, error = %err, "Expiry sweep failed"),
            }
        }
    })
}
