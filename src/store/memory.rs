//! Memory Store Module
//!
//! Ordered in-memory engine implementing [`KeyValueStore`].

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use super::{BatchOp, KeyValueStore, KvPair, StoreResult, StoreStats, WriteBatch};
use crate::error::StoreError;

// == Memory Store ==
/// BTreeMap-backed store. Batches are applied under a single write lock so
/// readers never observe a partially applied batch.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
    /// Sum of key and value lengths currently held
    size_bytes: usize,
    closed: bool,
}

impl Inner {
    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }

    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        let added = key.len() + value.len();
        if let Some(old) = self.entries.insert(key.clone(), value) {
            self.size_bytes -= key.len() + old.len();
        }
        self.size_bytes += added;
    }

    fn remove(&mut self, key: &[u8]) {
        if let Some(old) = self.entries.remove(key) {
            self.size_bytes -= key.len() + old.len();
        }
    }
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty, open store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Returns true if no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Returns true once [`KeyValueStore::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.read().closed
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        let inner = self.inner.read();
        inner.ensure_open()?;
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        let mut inner = self.inner.write();
        inner.ensure_open()?;
        inner.put(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        let mut inner = self.inner.write();
        inner.ensure_open()?;
        inner.remove(key);
        Ok(())
    }

    fn scan_range(&self, start: &[u8], end: Option<&[u8]>) -> StoreResult<Vec<KvPair>> {
        let inner = self.inner.read();
        inner.ensure_open()?;

        let pairs = inner
            .entries
            .range(start.to_vec()..)
            .take_while(|(key, _)| end.map_or(true, |end| key.as_slice() < end))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(pairs)
    }

    fn write_batch(&self, batch: WriteBatch) -> StoreResult<()> {
        let mut inner = self.inner.write();
        inner.ensure_open()?;

        let ops = batch.len();
        for op in batch {
            match op {
                BatchOp::Put { key, value } => inner.put(key, value),
                BatchOp::Delete { key } => inner.remove(&key),
            }
        }
        debug!(ops, "Applied write batch");
        Ok(())
    }

    fn stats(&self) -> StoreResult<StoreStats> {
        let inner = self.inner.read();
        inner.ensure_open()?;
        Ok(StoreStats {
            memtable_size: inner.size_bytes,
            memtable_entries: inner.entries.len(),
            // No read cache in front of the map
            cache_entries: 0,
        })
    }

    fn close(&self) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if !inner.closed {
            inner.closed = true;
            inner.entries.clear();
            inner.size_bytes = 0;
            debug!("Memory store closed");
        }
        Ok(())
    }
}
