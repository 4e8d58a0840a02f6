//! Background Tasks Module
//!
//! Periodic eager expiry for cache layers and session stores.
//!
//! # Tasks
//! - Sweep: Removes expired entries or sessions at a configured interval

mod sweep;

pub use sweep::{spawn_sweep_task, Sweep};
