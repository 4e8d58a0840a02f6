//! Session Store Module
//!
//! Session lifecycle: creation, sliding expiry on read, partial updates,
//! per-user lookup and bulk expiry sweeps.

use std::sync::Arc;

use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::ids::{IdGenerator, RandomIdGenerator};
use crate::session::{session_key, SessionData, SessionRecord, SessionStats, SESSION_PREFIX};
use crate::store::KeyValueStore;

// == Session Store ==
/// Sliding-expiration session store.
///
/// Every session shares the same TTL. A session stays live while it is read
/// or updated at least once per TTL window.
#[derive(Debug)]
pub struct SessionStore<S: KeyValueStore> {
    store: S,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    ttl_seconds: u64,
}

impl<S: KeyValueStore> SessionStore<S> {
    // == Constructor ==
    /// Creates a session store over `store`.
    ///
    /// # Arguments
    /// * `store` - Backing key-value store
    /// * `ttl_seconds` - Idle time after which a session expires
    pub fn new(store: S, ttl_seconds: u64) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            ids: Arc::new(RandomIdGenerator),
            ttl_seconds,
        }
    }

    /// Creates a session store using the configured session TTL.
    pub fn from_config(store: S, config: &Config) -> Self {
        Self::new(store, config.session_ttl)
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replaces the session identifier generator.
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // == Create ==
    /// Creates a session for `user_id` and returns its fresh identifier.
    pub fn create_session(&self, user_id: &str, data: Option<SessionData>) -> Result<String> {
        let session_id = self.ids.generate();
        let record = SessionRecord::new(
            session_id.clone(),
            user_id,
            data.unwrap_or_default(),
            self.clock.now(),
        );
        self.write(&record)?;

        debug!(user_id, "Created session");
        Ok(session_id)
    }

    // == Get ==
    /// Returns a live session and slides its expiry forward.
    ///
    /// An expired session is deleted and `None` is returned.
    pub fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        let Some(bytes) = self.store.get(&session_key(session_id))? else {
            return Ok(None);
        };
        let mut record: SessionRecord = serde_json::from_slice(&bytes)?;

        let now = self.clock.now();
        if record.is_expired_at(now, self.ttl_seconds) {
            debug!(
                user_id = %record.user_id,
                last_accessed = %record.last_accessed,
                "Session expired on read"
            );
            self.delete_session(session_id)?;
            return Ok(None);
        }

        record.touch(now);
        self.write(&record)?;
        Ok(Some(record))
    }

    // == Update ==
    /// Merges `partial_data` into a live session.
    ///
    /// Keys in `partial_data` overwrite existing ones; other keys are kept.
    /// Returns false without writing when the session is missing or expired.
    pub fn update_session(&self, session_id: &str, partial_data: SessionData) -> Result<bool> {
        let Some(mut record) = self.get_session(session_id)? else {
            return Ok(false);
        };

        record.merge(partial_data);
        record.touch(self.clock.now());
        self.write(&record)?;
        Ok(true)
    }

    // == Delete ==
    /// Deletes a session. Deleting an unknown session succeeds.
    pub fn delete_session(&self, session_id: &str) -> Result<()> {
        self.store.delete(&session_key(session_id))?;
        Ok(())
    }

    // == User Sessions ==
    /// Lists the identifiers of every stored session owned by `user_id`.
    ///
    /// Liveness is not checked, so expired sessions awaiting a sweep appear too.
    pub fn get_user_sessions(&self, user_id: &str) -> Result<Vec<String>> {
        let mut sessions = Vec::new();
        for record in self.scan_records()? {
            if record.user_id == user_id {
                sessions.push(record.session_id);
            }
        }
        Ok(sessions)
    }

    // == Cleanup Expired ==
    /// Deletes every expired session in one atomic batch and returns how many.
    pub fn cleanup_expired_sessions(&self) -> Result<usize> {
        let now = self.clock.now();
        let expired: Vec<String> = self
            .scan_records()?
            .into_iter()
            .filter(|record| record.is_expired_at(now, self.ttl_seconds))
            .map(|record| record.session_id)
            .collect();

        if expired.is_empty() {
            debug!("Session sweep: no expired sessions found");
            return Ok(0);
        }

        self.store.batch(|batch| {
            for session_id in &expired {
                batch.delete(session_key(session_id));
            }
            Ok::<(), CacheError>(())
        })?;

        info!(removed = expired.len(), "Session sweep removed expired sessions");
        Ok(expired.len())
    }

    // == Stats ==
    /// Returns a statistics snapshot.
    pub fn get_stats(&self) -> Result<SessionStats> {
        let total_sessions = self.store.scan_prefix(SESSION_PREFIX.as_bytes())?.len();
        Ok(SessionStats {
            total_sessions,
            store: self.store.stats()?,
        })
    }

    // == Close ==
    /// Releases the backing store.
    pub fn close(self) -> Result<()> {
        self.store.close()?;
        debug!("Session store closed");
        Ok(())
    }

    fn write(&self, record: &SessionRecord) -> Result<()> {
        let bytes = serde_json::to_vec(record)?;
        self.store.set(&session_key(&record.session_id), &bytes)?;
        Ok(())
    }

    fn scan_records(&self) -> Result<Vec<SessionRecord>> {
        self.store
            .scan_prefix(SESSION_PREFIX.as_bytes())?
            .into_iter()
            .map(|(_, bytes)| serde_json::from_slice(&bytes).map_err(CacheError::from))
            .collect()
    }
}
