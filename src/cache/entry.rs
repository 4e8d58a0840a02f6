//! Cache Entry Module
//!
//! Metadata record stored alongside every cached value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::add_ttl;

// == Cache Metadata ==
/// Metadata record kept under `meta:<key>`, paired with the value under `cache:<key>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Logical cache key (without prefix)
    pub key: String,
    /// Write timestamp
    pub created_at: DateTime<Utc>,
    /// Fixed at write time as `created_at + ttl`; reads never move it
    pub expires_at: DateTime<Utc>,
    /// TTL in seconds
    pub ttl: u64,
    /// Length of the serialized value at write time
    pub size_bytes: usize,
}

impl CacheMetadata {
    // == Constructor ==
    /// Builds metadata for a value written at `now`.
    ///
    /// # Arguments
    /// * `key` - Logical cache key
    /// * `now` - Write timestamp
    /// * `ttl` - TTL in seconds
    /// * `size_bytes` - Serialized value length
    pub fn new(key: impl Into<String>, now: DateTime<Utc>, ttl: u64, size_bytes: usize) -> Self {
        Self {
            key: key.into(),
            created_at: now,
            expires_at: add_ttl(now, ttl),
            ttl,
            size_bytes,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is expired at `now`.
    ///
    /// Boundary condition: the entry is expired once `now >= expires_at`, so a
    /// fully elapsed TTL never serves a hit.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
