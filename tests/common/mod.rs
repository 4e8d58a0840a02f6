//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

use kv_cache::store::{KeyValueStore, KvPair, MemoryStore, StoreResult, StoreStats};
use kv_cache::{StoreError, WriteBatch};

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "kv_cache=debug".into()),
            )
            .with_test_writer()
            .init();
    });
}

/// Memory store whose batch writes can be made to fail on demand.
#[derive(Debug, Default)]
pub struct FaultyStore {
    inner: MemoryStore,
    fail_batches: AtomicBool,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_batches(&self, fail: bool) {
        self.fail_batches.store(fail, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

impl KeyValueStore for FaultyStore {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.inner.set(key, value)
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        self.inner.delete(key)
    }

    fn scan_range(&self, start: &[u8], end: Option<&[u8]>) -> StoreResult<Vec<KvPair>> {
        self.inner.scan_range(start, end)
    }

    fn write_batch(&self, batch: WriteBatch) -> StoreResult<()> {
        if self.fail_batches.load(Ordering::SeqCst) {
            return Err(StoreError::Io("injected batch failure".to_string()));
        }
        self.inner.write_batch(batch)
    }

    fn stats(&self) -> StoreResult<StoreStats> {
        self.inner.stats()
    }

    fn close(&self) -> StoreResult<()> {
        self.inner.close()
    }
}
