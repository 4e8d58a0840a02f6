//! Configuration Module
//!
//! Handles loading TTL and sweep settings from environment variables.

use std::env;

/// Default cache TTL in seconds
pub const DEFAULT_CACHE_TTL: u64 = 3600;

/// Default session TTL in seconds
pub const DEFAULT_SESSION_TTL: u64 = 3600;

/// Default background sweep interval in seconds
pub const DEFAULT_SWEEP_INTERVAL: u64 = 60;

/// Component configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// TTL in seconds for cache writes without an explicit TTL
    pub default_ttl: u64,
    /// Sliding TTL in seconds applied to every session
    pub session_ttl: u64,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL` - Cache TTL in seconds (default: 3600)
    /// - `SESSION_TTL` - Session TTL in seconds (default: 3600)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        Self {
            default_ttl: env_or("DEFAULT_TTL", DEFAULT_CACHE_TTL),
            session_ttl: env_or("SESSION_TTL", DEFAULT_SESSION_TTL),
            sweep_interval: env_or("SWEEP_INTERVAL", DEFAULT_SWEEP_INTERVAL),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_CACHE_TTL,
            session_ttl: DEFAULT_SESSION_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

fn env_or(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_ttl, 3600);
        assert_eq!(config.session_ttl, 3600);
        assert_eq!(config.sweep_interval, 60);
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the env to avoid races between parallel tests
        env::remove_var("DEFAULT_TTL");
        env::remove_var("SESSION_TTL");
        env::remove_var("SWEEP_INTERVAL");
        assert_eq!(Config::from_env(), Config::default());

        env::set_var("DEFAULT_TTL", "5");
        env::set_var("SESSION_TTL", "not-a-number");
        let config = Config::from_env();
        assert_eq!(config.default_ttl, 5);
        assert_eq!(config.session_ttl, DEFAULT_SESSION_TTL);

        env::remove_var("DEFAULT_TTL");
        env::remove_var("SESSION_TTL");
    }
}
