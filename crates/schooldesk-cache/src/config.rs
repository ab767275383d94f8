//! Permission cache configuration.
//!
//! This module provides configuration for the durable cache location loaded
//! from environment variables.

use std::env;
use std::path::PathBuf;

/// Cache configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `SCHOOLDESK_CACHE_DIR`: Directory holding cache entries (default: `.schooldesk`)
/// - `SCHOOLDESK_CACHE_PREFIX`: Prefix for all cache keys (default: `schooldesk`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Directory the file store writes into. One directory per profile.
    pub dir: PathBuf,

    /// Prefix for all cache keys to avoid collisions.
    pub key_prefix: String,
}

impl CacheConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            dir: lookup("SCHOOLDESK_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dir),
            key_prefix: lookup("SCHOOLDESK_CACHE_PREFIX").unwrap_or(defaults.key_prefix),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".schooldesk"),
            key_prefix: "schooldesk".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(CacheConfig::from_lookup(|_| None), CacheConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = CacheConfig::from_lookup(|key| match key {
            "SCHOOLDESK_CACHE_DIR" => Some("/tmp/profile-a".into()),
            "SCHOOLDESK_CACHE_PREFIX" => Some("desk".into()),
            _ => None,
        });
        assert_eq!(config.dir, PathBuf::from("/tmp/profile-a"));
        assert_eq!(config.key_prefix, "desk");
    }
}
