//! Read-through cache orchestration.
//!
//! A [`CacheStore`] maps a key derived from resource type (and id, where
//! applicable) to a previously serialized response payload. [`ReadThrough`]
//! consults it before the database and treats every cache failure as a miss
//! with added latency: the request is served from the database and the
//! outage never reaches the client.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use forno_core::Result;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Cache failures never map to a response; they are logged at the call
/// site and the request falls back to the database.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),

    #[error("cache operation timed out")]
    Timeout,
}

/// Keyed store for serialized response payloads.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Store with the given expiration, overwriting any existing entry.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()>;

    /// Remove an entry. Absent keys are a no-op, not an error.
    async fn invalidate(&self, key: &str) -> CacheResult<()>;
}

/// Cache key scheme: one key per collection, one per individual resource.
pub mod keys {
    pub const RESTAURANTS: &str = "restaurants";
    pub const PIZZAS: &str = "pizzas";

    pub fn restaurant(id: i64) -> String {
        format!("restaurants:{id}")
    }
}

/// How a read-through lookup was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Served from the cache.
    Hit,
    /// Fetched from the database and cached.
    Miss,
    /// Cache unavailable, disabled, or timed out; served from the database.
    Fallback,
}

/// Typed read-through front for an optional cache backend. Every cache call
/// is bounded by `timeout`; expiry counts as a cache failure.
#[derive(Clone)]
pub struct ReadThrough {
    cache: Option<Arc<dyn CacheStore>>,
    ttl: Duration,
    timeout: Duration,
}

impl ReadThrough {
    pub fn new(cache: Option<Arc<dyn CacheStore>>, ttl: Duration, timeout: Duration) -> Self {
        Self {
            cache,
            ttl,
            timeout,
        }
    }

    /// Look up `key`; on miss run `fetch` against the database and populate
    /// the cache best-effort. Errors from `fetch` (including NotFound) are
    /// returned as-is and never cached.
    pub async fn fetch<T, F, Fut>(&self, key: &str, fetch: F) -> Result<(T, ReadOutcome)>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let Some(cache) = &self.cache else {
            return Ok((fetch().await?, ReadOutcome::Fallback));
        };

        match bounded(self.timeout, cache.get(key)).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => return Ok((value, ReadOutcome::Hit)),
                Err(e) => {
                    // Corrupt entry: discard it and treat the read as a miss.
                    warn!("discarding undecodable cache entry for {}: {}", key, e);
                    if let Err(e) = bounded(self.timeout, cache.invalidate(key)).await {
                        warn!("failed to discard cache entry for {}: {}", key, e);
                    }
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!("cache read failed for {}, falling back to storage: {}", key, e);
                return Ok((fetch().await?, ReadOutcome::Fallback));
            }
        }

        let value = fetch().await?;
        match serde_json::to_vec(&value) {
            Ok(bytes) => {
                if let Err(e) = bounded(self.timeout, cache.set(key, bytes, self.ttl)).await {
                    warn!("failed to populate cache for {}: {}", key, e);
                }
            }
            Err(e) => warn!("failed to serialize payload for {}: {}", key, e),
        }
        Ok((value, ReadOutcome::Miss))
    }

    /// Invalidate every given key. Failures are logged, never surfaced:
    /// by the time this runs the write has already been persisted.
    pub async fn invalidate(&self, keys: &[&str]) {
        let Some(cache) = &self.cache else {
            return;
        };
        for key in keys {
            match bounded(self.timeout, cache.invalidate(key)).await {
                Ok(()) => debug!("invalidated cache key {}", key),
                Err(e) => warn!("failed to invalidate cache key {}: {}", key, e),
            }
        }
    }
}

async fn bounded<T>(
    limit: Duration,
    op: impl Future<Output = CacheResult<T>>,
) -> CacheResult<T> {
    match tokio::time::timeout(limit, op).await {
        Ok(result) => result,
        Err(_) => Err(CacheError::Timeout),
    }
}
