//! Redis cache backend

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::cache::{CacheError, CacheResult, CacheStore};

/// Redis-backed [`CacheStore`]. The connection manager reconnects on its
/// own; individual command failures surface as [`CacheError::Backend`] and
/// the read-through path falls back to the database.
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

fn backend_err(e: redis::RedisError) -> CacheError {
    CacheError::Backend(e.to_string())
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(backend_err)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        // SET EX takes whole seconds; a sub-second TTL still needs to expire.
        let seconds = ttl.as_secs().max(1);
        conn.set_ex(key, value, seconds).await.map_err(backend_err)
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        // DEL on a missing key returns 0, which is already a no-op for us.
        conn.del(key).await.map_err(backend_err)
    }
}
