//! Redis connection configuration.

use std::env;

/// # Environment Variables
///
/// - `REDIS_URL`: Redis connection URL. When unset, sessions are kept in
///   process memory.
/// - `CACHE_PREFIX`: Prefix for all keys (default: `schoolhub`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    pub redis_url: Option<String>,
    pub key_prefix: String,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            key_prefix: env::var("CACHE_PREFIX").unwrap_or_else(|_| "schoolhub".into()),
        }
    }

    /// `prefixed_key("reset:abc")` -> `schoolhub:reset:abc`
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            key_prefix: "schoolhub".into(),
        }
    }
}
