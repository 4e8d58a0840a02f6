//! Cache Module
//!
//! Cache-aside layer with TTL expiration over an ordered key-value store.

mod entry;
mod layer;
mod stats;


// Re-export public types
pub use entry::CacheMetadata;
pub use layer::CacheLayer;
pub use stats::{CacheCounters, CacheStats};

// == Public Constants ==
/// Prefix of every value record key
pub const CACHE_PREFIX: &str = "cache:";

/// Prefix of every metadata record key
pub const META_PREFIX: &str = "meta:";

/// Store key of the value record for `key`.
pub fn value_key(key: &str) -> Vec<u8> {
    format!("{CACHE_PREFIX}{key}").into_bytes()
}

/// Store key of the metadata record for `key`.
pub fn meta_key(key: &str) -> Vec<u8> {
    format!("{META_PREFIX}{key}").into_bytes()
}
