//! Session Statistics Module
//!
//! Point-in-time figures reported by the session store.

use serde::Serialize;

use crate::store::StoreStats;

// == Session Stats ==
/// Point-in-time statistics for a session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Session records present, including expired ones not yet swept
    pub total_sessions: usize,
    /// Engine metrics passed through from the store
    pub store: StoreStats,
}
