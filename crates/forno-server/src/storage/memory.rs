//! In-process cache backend using DashMap (no external service needed)

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use super::cache::{CacheResult, CacheStore};

/// In-memory [`CacheStore`] with per-entry TTL. Infallible by construction,
/// but kept behind the trait so the read-through path is identical for
/// every backend.
pub struct MemoryCache {
    data: Arc<DashMap<String, CacheEntry>>,
}

struct CacheEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl MemoryCache {
    pub fn new() -> Self {
        let cache = Self {
            data: Arc::new(DashMap::new()),
        };

        // Expired entries are also dropped lazily on read; the sweeper just
        // keeps memory bounded for keys nobody asks for again.
        cache.start_sweeper();

        cache
    }

    fn start_sweeper(&self) {
        let data = self.data.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;

                let now = Instant::now();
                let expired: Vec<String> = data
                    .iter()
                    .filter(|entry| now > entry.expires_at)
                    .map(|entry| entry.key().clone())
                    .collect();

                for key in expired {
                    data.remove(&key);
                }
            }
        });
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.data.get(key).and_then(|entry| {
            if Instant::now() > entry.expires_at {
                drop(entry);
                self.data.remove(key);
                return None;
            }
            Some(entry.value.clone())
        }))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        self.data.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        self.data.remove(key);
        Ok(())
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}
