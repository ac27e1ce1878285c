//! Storage for short-lived, per-session state.
//!
//! Entries are opaque strings with a TTL. Redis is used when `REDIS_URL` is
//! configured; otherwise, or when Redis cannot be reached at startup, state
//! lives in process memory and is lost on restart.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::CacheConfig;
use crate::redis::{CacheError, RedisCache};

#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Value under `key`, or `None` if it was never written or has expired.
    async fn load(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Writes `value`, replacing any previous value and restarting the TTL.
    async fn store(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Removes and returns the value under `key`. Concurrent callers never
    /// both receive the same value.
    async fn take(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn remove(&self, key: &str) -> Result<(), CacheError>;
}

#[async_trait]
impl SessionStore for RedisCache {
    async fn load(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.get_raw(key).await
    }

    async fn store(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.set_raw_with_ttl(key, value, ttl).await
    }

    async fn take(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.take_raw(key).await
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.invalidate(key).await
    }
}

/// In-process store. Expired entries are dropped when read and swept on
/// every write.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<RwLock<HashMap<String, (String, Instant)>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some((value, expires_at)) if *expires_at > now => return Ok(Some(value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        self.entries.write().await.remove(key);
        Ok(None)
    }

    async fn store(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(key.to_string(), (value, now + ttl));
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        let taken = self.entries.write().await.remove(key);
        Ok(taken
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(value, _)| value))
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Picks the session backend for `config`.
pub async fn connect_session_store(config: &CacheConfig) -> Arc<dyn SessionStore> {
    let Some(url) = config.redis_url.as_deref() else {
        info!("REDIS_URL not set, keeping sessions in memory");
        return Arc::new(MemorySessionStore::new());
    };

    match RedisCache::new(url, config.key_prefix.clone()).await {
        Ok(cache) => {
            info!("Session store connected to Redis");
            Arc::new(cache)
        }
        Err(e) => {
            warn!(error = %e, "Redis unavailable, falling back to in-memory sessions");
            Arc::new(MemorySessionStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new();
        store
            .store("k", "v".into(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.load("k").await.unwrap(), Some("v".to_string()));
        assert_eq!(store.len().await, 1);

        store.remove("k").await.unwrap();
        assert_eq!(store.load("k").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_store_overwrites() {
        let store = MemorySessionStore::new();
        store.store("k", "a".into(), Duration::from_secs(60)).await.unwrap();
        store.store("k", "b".into(), Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.load("k").await.unwrap(), Some("b".to_string()));
    }

    #[tokio::test]
    async fn test_memory_store_expires_entries() {
        let store = MemorySessionStore::new();
        store.store("k", "v".into(), Duration::ZERO).await.unwrap();

        assert_eq!(store.load("k").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_sweeps_expired_entries() {
        let store = MemorySessionStore::new();
        for key in ["a", "b", "c"] {
            store.store(key, "v".into(), Duration::ZERO).await.unwrap();
        }
        store.store("live", "v".into(), Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.entries.read().await.len(), 1);
        assert!(store.entries.read().await.contains_key("live"));
    }

    #[tokio::test]
    async fn test_take_hands_out_value_once() {
        let store = MemorySessionStore::new();
        store.store("k", "v".into(), Duration::from_secs(60)).await.unwrap();

        let (first, second) = tokio::join!(store.take("k"), store.take("k"));
        let mut taken = vec![first.unwrap(), second.unwrap()];
        taken.sort();
        assert_eq!(taken, vec![None, Some("v".to_string())]);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_take_ignores_expired_entry() {
        let store = MemorySessionStore::new();
        store.store("k", "v".into(), Duration::ZERO).await.unwrap();
        assert_eq!(store.take("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_redis_url_uses_memory() {
        let store = connect_session_store(&CacheConfig::default()).await;
        store.store("k", "v".into(), Duration::from_secs(5)).await.unwrap();
        assert_eq!(store.load("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_mock_store_is_usable_as_trait_object() {
        let mut mock = MockSessionStore::new();
        mock.expect_load().returning(|_| Ok(None));
        let store: Arc<dyn SessionStore> = Arc::new(mock);
        assert_eq!(store.load("anything").await.unwrap(), None);
    }
}
