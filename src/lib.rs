//! KV Cache - cache-aside and session storage on an ordered key-value store
//!
//! Provides a TTL cache layer with paired value/metadata records and a
//! sliding-expiration session store, plus background expiry sweeps.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod ids;
pub mod session;
pub mod store;
pub mod tasks;

pub use cache::{CacheLayer, CacheStats};
pub use config::Config;
pub use error::{CacheError, Result, StoreError};
pub use session::{SessionData, SessionRecord, SessionStats, SessionStore};
pub use store::{KeyValueStore, MemoryStore, WriteBatch};
pub use tasks::spawn_sweep_task;
