//! Session Module
//!
//! Sliding-expiration session storage over an ordered key-value store.

mod record;
mod stats;
mod store;

pub use record::{SessionData, SessionRecord};
pub use stats::SessionStats;
pub use store::SessionStore;

/// Prefix of every session record key
pub const SESSION_PREFIX: &str = "session:";

/// Store key of the record for `session_id`.
pub fn session_key(session_id: &str) -> Vec<u8> {
    format!("{SESSION_PREFIX}{session_id}").into_bytes()
}
