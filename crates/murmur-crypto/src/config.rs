//! Runtime configuration.
//!
//! Algorithm parameters are fixed in [`crate::defaults`]. The only tunable is
//! the capacity of the caller-owned key caches.

use serde::{Deserialize, Serialize};

use crate::defaults::{KEY_CACHE_CAPACITY, KEY_CACHE_CAPACITY_ENV};

/// Configuration for [`crate::cache::KeyCache`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCacheConfig {
    /// Maximum number of entries. 0 disables caching.
    pub capacity: usize,
}

impl Default for KeyCacheConfig {
    fn default() -> Self {
        Self {
            capacity: KEY_CACHE_CAPACITY,
        }
    }
}

impl KeyCacheConfig {
    /// Load configuration from environment variables with fallback to defaults.
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(KEY_CACHE_CAPACITY_ENV).ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        let mut config = Self::default();

        if let Some(val) = value {
            match val.trim().parse::<usize>() {
                Ok(capacity) => config.capacity = capacity,
                Err(_) => {
                    tracing::warn!(
                        subsystem = "crypto",
                        value = %val,
                        "Invalid MURMUR_KEY_CACHE_CAPACITY, using default"
                    );
                }
            }
        }

        config
    }

    /// Whether caching is enabled.
    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }
}
