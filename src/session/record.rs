//! Session Record Module
//!
//! The single record persisted for each session.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Application fields attached to a session.
pub type SessionData = Map<String, Value>;

// == Session Record ==
/// A session as stored under `session:<session_id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    /// Moved forward on every live read or update
    pub last_accessed: DateTime<Utc>,
    #[serde(default)]
    pub data: SessionData,
}

impl SessionRecord {
    /// Creates a record that was both created and last accessed at `now`.
    pub fn new(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        data: SessionData,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            created_at: now,
            last_accessed: now,
            data,
        }
    }

    /// Returns true once more than `ttl_secs` have passed since the last access.
    ///
    /// A session idle for exactly `ttl_secs` is still live.
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl_secs: u64) -> bool {
        let idle = now - self.last_accessed;
        match i64::try_from(ttl_secs).ok().and_then(TimeDelta::try_seconds) {
            Some(ttl) => idle > ttl,
            None => false,
        }
    }

    /// Records an access at `now`. Never moves `last_accessed` backwards.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_accessed {
            self.last_accessed = now;
        }
    }

    /// Merges `partial` into `data`, overwriting keys it names.
    pub fn merge(&mut self, partial: SessionData) {
        self.data.extend(partial);
    }
}
