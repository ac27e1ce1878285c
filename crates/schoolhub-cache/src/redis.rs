//! Redis client.
//!
//! Values are stored as plain strings; callers own their encoding.

use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, instrument};

/// Redis client backed by a reconnecting [`ConnectionManager`].
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    prefix: String,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),
}

impl RedisCache {
    /// Connects to `redis_url`; every key is namespaced under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if the connection fails.
    pub async fn new(redis_url: &str, prefix: impl Into<String>) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self {
            conn,
            prefix: prefix.into(),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    #[instrument(skip(self), fields(cache.operation = "GET"))]
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value = conn.get::<_, Option<String>>(self.key(key)).await?;

        debug!(cache.key = %key, hit = value.is_some(), "Cache lookup");
        Ok(value)
    }

    #[instrument(skip(self, value), fields(cache.operation = "SETEX"))]
    pub async fn set_raw_with_ttl(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();

        conn.set_ex::<_, _, ()>(self.key(key), value, ttl.as_secs().max(1))
            .await?;

        debug!(cache.key = %key, cache.ttl_secs = %ttl.as_secs(), "Cache set");
        Ok(())
    }

    /// Reads and deletes `key` in one step (`GETDEL`). Of several
    /// concurrent callers, at most one sees the value.
    #[instrument(skip(self), fields(cache.operation = "GETDEL"))]
    pub async fn take_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value = conn.get_del::<_, Option<String>>(self.key(key)).await?;

        debug!(cache.key = %key, hit = value.is_some(), "Cache take");
        Ok(value)
    }

    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    pub async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(self.key(key)).await?;

        debug!(cache.key = %key, "Cache invalidated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_set_take_and_invalidate() {
        let cache = RedisCache::new("redis://localhost:6379", "schoolhub-test")
            .await
            .unwrap();

        cache
            .set_raw_with_ttl("test:key", "value".into(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get_raw("test:key").await.unwrap().as_deref(), Some("value"));

        assert_eq!(cache.take_raw("test:key").await.unwrap().as_deref(), Some("value"));
        assert_eq!(cache.take_raw("test:key").await.unwrap(), None);

        cache
            .set_raw_with_ttl("test:key", "again".into(), Duration::from_secs(60))
            .await
            .unwrap();
        cache.invalidate("test:key").await.unwrap();
        assert_eq!(cache.get_raw("test:key").await.unwrap(), None);
    }
}
