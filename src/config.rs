//! Configuration Module
//!
//! Handles loading and merging cache engine configuration.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cache engine configuration parameters.
///
/// All values can be loaded from environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Default TTL for entries stored without an explicit TTL
    pub default_ttl: Duration,
    /// Interval between background sweep runs
    pub cleanup_interval: Duration,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL_SECS` - Default TTL in seconds (default: 300)
    /// - `CLEANUP_INTERVAL_SECS` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env::var("MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_entries),
            default_ttl: env::var("DEFAULT_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.default_ttl),
            cleanup_interval: env::var("CLEANUP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.cleanup_interval),
        }
    }

    /// Merges the provided fields into this configuration.
    ///
    /// Fields left as `None` keep their current value.
    pub fn apply(&mut self, update: CacheConfigUpdate) {
        if let Some(max_entries) = update.max_entries {
            self.max_entries = max_entries;
        }
        if let Some(default_ttl) = update.default_ttl {
            self.default_ttl = default_ttl;
        }
        if let Some(cleanup_interval) = update.cleanup_interval {
            self.cleanup_interval = cleanup_interval;
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: Duration::from_secs(300),
            cleanup_interval: Duration::from_secs(60),
        }
    }
}

/// Partial configuration for live updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfigUpdate {
    /// New entry capacity, applied lazily on the next insert
    pub max_entries: Option<usize>,
    /// New default TTL for subsequent writes
    pub default_ttl: Option<Duration>,
    /// New sweep interval; the sweep task is restarted with this period
    pub cleanup_interval: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.default_ttl, Duration::from_secs(300));
        assert_eq!(config.cleanup_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("MAX_ENTRIES");
        env::remove_var("DEFAULT_TTL_SECS");
        env::remove_var("CLEANUP_INTERVAL_SECS");

        let config = CacheConfig::from_env();
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_config_apply_merges_only_provided_fields() {
        let mut config = CacheConfig::default();
        config.apply(CacheConfigUpdate {
            max_entries: Some(50),
            default_ttl: None,
            cleanup_interval: Some(Duration::from_secs(5)),
        });

        assert_eq!(config.max_entries, 50);
        assert_eq!(config.default_ttl, Duration::from_secs(300));
        assert_eq!(config.cleanup_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_config_apply_empty_update_is_noop() {
        let mut config = CacheConfig::default();
        config.apply(CacheConfigUpdate::default());
        assert_eq!(config, CacheConfig::default());
    }
}
