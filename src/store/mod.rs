//! Store Module
//!
//! The ordered key-value contract both components are built on, plus an
//! in-memory engine implementing it.

mod batch;
mod memory;

use std::sync::Arc;

use serde::Serialize;

use crate::error::StoreError;

pub use batch::{BatchOp, WriteBatch};
pub use memory::MemoryStore;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A `(key, value)` pair returned by a scan.
pub type KvPair = (Vec<u8>, Vec<u8>);

// == Store Stats ==
/// Aggregate engine metrics passed through by component statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Bytes held in the in-memory write buffer
    pub memtable_size: usize,
    /// Live keys held in the in-memory write buffer
    pub memtable_entries: usize,
    /// Entries held in the read cache
    pub cache_entries: usize,
}

// == Key Value Store Trait ==
/// Ordered byte-string key space with atomic batches.
///
/// Keys are ordered lexicographically by their raw bytes.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Inserts or replaces the value under `key`.
    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Removes `key`. Deleting a missing key succeeds.
    fn delete(&self, key: &[u8]) -> StoreResult<()>;

    /// Returns every pair with `start <= key < end` in key order.
    ///
    /// A `None` end leaves the range unbounded above.
    fn scan_range(&self, start: &[u8], end: Option<&[u8]>) -> StoreResult<Vec<KvPair>>;

    /// Applies every operation in `batch` atomically.
    ///
    /// Either all operations become visible together or none do.
    fn write_batch(&self, batch: WriteBatch) -> StoreResult<()>;

    /// Returns aggregate engine metrics.
    fn stats(&self) -> StoreResult<StoreStats>;

    /// Releases the engine. Later calls fail with [`StoreError::Closed`].
    fn close(&self) -> StoreResult<()>;

    /// Returns every pair whose key starts with `prefix`, in key order.
    fn scan_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<KvPair>> {
        let end = prefix_end(prefix);
        self.scan_range(prefix, end.as_deref())
    }

    /// Collects operations inside `f` and commits them atomically if it succeeds.
    ///
    /// Nothing is written when `f` returns an error. An empty batch still
    /// reaches [`KeyValueStore::write_batch`].
    fn batch<F, E>(&self, f: F) -> std::result::Result<(), E>
    where
        Self: Sized,
        F: FnOnce(&mut WriteBatch) -> std::result::Result<(), E>,
        E: From<StoreError>,
    {
        let mut batch = WriteBatch::new();
        f(&mut batch)?;
        self.write_batch(batch)?;
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        (**self).delete(key)
    }

    fn scan_range(&self, start: &[u8], end: Option<&[u8]>) -> StoreResult<Vec<KvPair>> {
        (**self).scan_range(start, end)
    }

    fn write_batch(&self, batch: WriteBatch) -> StoreResult<()> {
        (**self).write_batch(batch)
    }

    fn stats(&self) -> StoreResult<StoreStats> {
        (**self).stats()
    }

    fn close(&self) -> StoreResult<()> {
        (**self).close()
    }
}

// == Prefix End ==
/// Returns the smallest key greater than every key starting with `prefix`.
///
/// Trailing `0xFF` bytes are dropped and the last remaining byte is
/// incremented. `None` means the range has no upper bound (empty prefix or
/// all `0xFF`).
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_end_simple() {
        assert_eq!(prefix_end(b"meta:"), Some(b"meta;".to_vec()));
        assert_eq!(prefix_end(b"a"), Some(b"b".to_vec()));
    }

    #[test]
    fn test_prefix_end_trailing_max_bytes() {
        assert_eq!(prefix_end(&[0x61, 0xFF, 0xFF]), Some(vec![0x62]));
    }

    #[test]
    fn test_prefix_end_unbounded() {
        assert_eq!(prefix_end(b""), None);
        assert_eq!(prefix_end(&[0xFF, 0xFF]), None);
    }

    #[test]
    fn test_scan_prefix_through_arc() {
        let store = Arc::new(MemoryStore::new());
        store.set(b"meta:a", b"1").unwrap();
        store.set(b"meta:b", b"2").unwrap();
        store.set(b"metb", b"x").unwrap();
        store.set(b"session:a", b"3").unwrap();

        let keys: Vec<Vec<u8>> = store
            .scan_prefix(b"meta:")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![b"meta:a".to_vec(), b"meta:b".to_vec()]);
    }

    #[test]
    fn test_batch_scope_commits_on_ok() {
        let store = MemoryStore::new();
        store
            .batch(|batch| {
                batch.put(b"a".to_vec(), b"1".to_vec());
                batch.put(b"b".to_vec(), b"2".to_vec());
                Ok::<(), StoreError>(())
            })
            .unwrap();

        assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get(b"b").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_batch_scope_discards_on_err() {
        let store = MemoryStore::new();
        let result = store.batch(|batch| {
            batch.put(b"a".to_vec(), b"1".to_vec());
            Err(StoreError::Io("abort".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(store.get(b"a").unwrap(), None);
    }

    #[test]
    fn test_empty_batch_reaches_closed_store() {
        let store = MemoryStore::new();
        store.close().unwrap();

        let result = store.batch(|_| Ok::<(), StoreError>(()));

        assert_eq!(result, Err(StoreError::Closed));
    }
}
