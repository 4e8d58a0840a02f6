//! Error types for the cache and session components
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Store Error Enum ==
/// Failures raised by a [`KeyValueStore`](crate::store::KeyValueStore) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store handle was closed and can no longer serve requests
    #[error("Store is closed")]
    Closed,

    /// I/O or corruption failure inside the storage engine
    #[error("Store I/O error: {0}")]
    Io(String),
}

// == Cache Error Enum ==
/// Unified error type for cache and session operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Underlying key-value store failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Malformed metadata or record bytes
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key rejected before reaching the store
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache and session operations.
pub type Result<T> = std::result::Result<T, CacheError>;
