//! Cache Layer Module
//!
//! Cache-aside engine storing each entry as a value record and a metadata
//! record that are always written and removed together.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::cache::{meta_key, value_key, CacheCounters, CacheMetadata, CacheStats, META_PREFIX};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::store::{KeyValueStore, WriteBatch};

// == Cache Layer ==
/// TTL cache-aside layer over an ordered key-value store.
#[derive(Debug)]
pub struct CacheLayer<S: KeyValueStore> {
    /// Backing store
    store: S,
    /// Time source for TTL evaluation
    clock: Arc<dyn Clock>,
    /// TTL in seconds for writes without an explicit TTL
    default_ttl: u64,
    /// Local hit/miss/write/eviction counters
    counters: CacheCounters,
}

impl<S: KeyValueStore> CacheLayer<S> {
    // == Constructor ==
    /// Creates a cache layer over `store`.
    ///
    /// # Arguments
    /// * `store` - Backing key-value store
    /// * `default_ttl` - TTL in seconds for writes without an explicit TTL
    pub fn new(store: S, default_ttl: u64) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            default_ttl,
            counters: CacheCounters::new(),
        }
    }

    /// Creates a cache layer using the configured default TTL.
    pub fn from_config(store: S, config: &Config) -> Self {
        Self::new(store, config.default_ttl)
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // == Get ==
    /// Retrieves a live value.
    ///
    /// Absent, expired and corrupt entries count as misses and return `None`;
    /// expired or corrupt entries are removed. A stored value that is valid JSON
    /// but does not match `T` surfaces `CacheError::Serialization` and is left
    /// in place. Never writes a value.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        validate_key(key)?;
        self.lookup(key)
    }

    // == Get Or Load ==
    /// Retrieves a live value, falling back to `loader` on a miss.
    ///
    /// A loaded value is written with `ttl` (or the default TTL) and returned.
    /// Loader errors are returned unchanged and nothing is cached.
    ///
    /// # Arguments
    /// * `key` - Cache key
    /// * `loader` - Produces the value when the cache misses
    /// * `ttl` - Optional TTL in seconds for the loaded value
    pub fn get_or_load<T, F, E>(
        &mut self,
        key: &str,
        loader: F,
        ttl: Option<u64>,
    ) -> std::result::Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> std::result::Result<T, E>,
        E: From<CacheError>,
    {
        validate_key(key)?;
        if let Some(value) = self.lookup(key)? {
            return Ok(value);
        }

        debug!(key, "Loading value after cache miss");
        let value = loader()?;
        self.set(key, &value, ttl)?;
        Ok(value)
    }

    // == Set ==
    /// Stores a value with optional TTL.
    ///
    /// The value and metadata records are written in one atomic batch. An
    /// existing entry is overwritten and its expiry reset.
    ///
    /// # Arguments
    /// * `key` - Cache key
    /// * `value` - Value to serialize and store
    /// * `ttl` - Optional TTL in seconds (uses default_ttl if None)
    pub fn set<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        ttl: Option<u64>,
    ) -> Result<()> {
        validate_key(key)?;
        let ttl = ttl.unwrap_or(self.default_ttl);
        let now = self.clock.now();

        self.store.batch(|batch| stage_entry(batch, key, value, now, ttl))?;
        self.counters.record_writes(1);

        debug!(key, ttl, "Cached value");
        Ok(())
    }

    // == Delete ==
    /// Removes an entry.
    ///
    /// Counted as an eviction whether or not the entry existed.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.remove_entry(key)?;
        self.counters.record_evictions(1);

        debug!(key, "Deleted cache entry");
        Ok(())
    }

    // == Clear Expired ==
    /// Removes every entry whose expiry is at or before now.
    ///
    /// All removals go out in a single atomic batch. Returns the number of
    /// entries removed.
    pub fn clear_expired(&mut self) -> Result<usize> {
        let now = self.clock.now();
        let mut expired = Vec::new();

        for (_, bytes) in self.store.scan_prefix(META_PREFIX.as_bytes())? {
            let metadata: CacheMetadata = serde_json::from_slice(&bytes)?;
            if metadata.is_expired_at(now) {
                expired.push(metadata.key);
            }
        }

        if expired.is_empty() {
            debug!("Cache sweep: no expired entries found");
            return Ok(0);
        }

        self.store.batch(|batch| {
            for key in &expired {
                stage_removal(batch, key);
            }
            Ok::<(), CacheError>(())
        })?;
        self.counters.record_evictions(expired.len() as u64);

        info!(removed = expired.len(), "Cache sweep removed expired entries");
        Ok(expired.len())
    }

    // == Warm Cache ==
    /// Writes many entries in one atomic batch.
    ///
    /// Every entry shares the same creation time. If any key is invalid or any
    /// value fails to serialize, nothing is written. A repeated key keeps its
    /// last value and is counted once. Returns the number of distinct keys
    /// written.
    ///
    /// # Arguments
    /// * `entries` - Key/value pairs to preload
    /// * `ttl` - Optional TTL in seconds for every entry (uses default_ttl if None)
    pub fn warm_cache<K, T, I>(&mut self, entries: I, ttl: Option<u64>) -> Result<usize>
    where
        K: AsRef<str>,
        T: Serialize,
        I: IntoIterator<Item = (K, T)>,
    {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let now = self.clock.now();
        let mut written = BTreeSet::new();

        self.store.batch(|batch| {
            for (key, value) in entries {
                let key = key.as_ref();
                validate_key(key)?;
                stage_entry(batch, key, &value, now, ttl)?;
                written.insert(key.to_string());
            }
            Ok::<(), CacheError>(())
        })?;
        let count = written.len();
        self.counters.record_writes(count as u64);

        info!(count, ttl, "Warmed cache");
        Ok(count)
    }

    // == Stats ==
    /// Returns a statistics snapshot.
    ///
    /// Entry count and byte size come from a scan of the metadata records, so
    /// entries awaiting lazy expiry are included.
    pub fn get_stats(&self) -> Result<CacheStats> {
        let mut current_entries = 0usize;
        let mut total_cached_size = 0usize;

        for (_, bytes) in self.store.scan_prefix(META_PREFIX.as_bytes())? {
            let metadata: CacheMetadata = serde_json::from_slice(&bytes)?;
            current_entries += 1;
            total_cached_size += metadata.size_bytes;
        }

        let store_stats = self.store.stats()?;
        Ok(CacheStats::new(
            &self.counters,
            current_entries,
            total_cached_size,
            store_stats,
        ))
    }

    // == Close ==
    /// Releases the backing store.
    pub fn close(self) -> Result<()> {
        self.store.close()?;
        debug!("Cache layer closed");
        Ok(())
    }

    fn lookup<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        let Some(meta_bytes) = self.store.get(&meta_key(key))? else {
            self.counters.record_miss();
            debug!(key, "Cache miss");
            return Ok(None);
        };

        let metadata: CacheMetadata = serde_json::from_slice(&meta_bytes)?;
        if metadata.is_expired_at(self.clock.now()) {
            debug!(key, expires_at = %metadata.expires_at, "Cache entry expired");
            return self.discard(key);
        }

        let Some(value_bytes) = self.store.get(&value_key(key))? else {
            warn!(key, "Discarding cache metadata without a value");
            return self.discard(key);
        };

        match serde_json::from_slice::<T>(&value_bytes) {
            Ok(value) => {
                self.counters.record_hit();
                trace!(key, "Cache hit");
                Ok(Some(value))
            }
            Err(err) if err.is_syntax() || err.is_eof() => {
                warn!(key, error = %err, "Discarding corrupt cache value");
                self.discard(key)
            }
            // Well-formed JSON of another shape; the entry stays in place.
            Err(err) => Err(err.into()),
        }
    }

    /// Drops a broken entry and counts the read as a miss.
    fn discard<T>(&mut self, key: &str) -> Result<Option<T>> {
        self.remove_entry(key)?;
        self.counters.record_miss();
        Ok(None)
    }

    fn remove_entry(&self, key: &str) -> Result<()> {
        self.store.batch(|batch| {
            stage_removal(batch, key);
            Ok::<(), CacheError>(())
        })
    }
}

// == Helpers ==
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key must not be empty".to_string()));
    }
    Ok(())
}

/// Queues the value and metadata records for `key`.
fn stage_entry<T: Serialize + ?Sized>(
    batch: &mut WriteBatch,
    key: &str,
    value: &T,
    now: DateTime<Utc>,
    ttl: u64,
) -> Result<()> {
    let value_bytes = serde_json::to_vec(value)?;
    let metadata = CacheMetadata::new(key, now, ttl, value_bytes.len());
    let meta_bytes = serde_json::to_vec(&metadata)?;

    batch.put(value_key(key), value_bytes);
    batch.put(meta_key(key), meta_bytes);
    Ok(())
}

fn stage_removal(batch: &mut WriteBatch, key: &str) {
    batch.delete(value_key(key));
    batch.delete(meta_key(key));
}
