//! Environment-driven configuration
//!
//! Everything has a default; a missing cache configuration means the
//! server runs with direct persistence access, never a startup failure.

use std::time::Duration;

use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub database_url: String,
    pub cache: Option<CacheConfig>,
    /// Bound on any single persistence call.
    pub db_timeout: Duration,
    pub seed_demo: bool,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Default expiration for cached payloads.
    pub ttl: Duration,
    /// Bound on any single cache call; expiry triggers persistence fallback.
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Redis { url: String },
}

impl Config {
    pub fn from_env() -> Self {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5555".to_string());
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://forno.db".to_string());

        let backend = match std::env::var("CACHE_BACKEND").ok().as_deref() {
            Some("redis") => match std::env::var("CACHE_URL") {
                Ok(url) => Some(CacheBackend::Redis { url }),
                Err(_) => {
                    warn!("CACHE_BACKEND=redis but CACHE_URL is not set, running without cache");
                    None
                }
            },
            Some("memory") => Some(CacheBackend::Memory),
            Some(other) => {
                warn!("Unknown CACHE_BACKEND '{}', running without cache", other);
                None
            }
            None => None,
        };

        let cache = backend.map(|backend| CacheConfig {
            backend,
            ttl: Duration::from_secs(env_u64("CACHE_TTL_SECS", 60)),
            timeout: Duration::from_millis(env_u64("CACHE_TIMEOUT_MS", 250)),
        });

        Self {
            bind_address,
            database_url,
            cache,
            db_timeout: Duration::from_millis(env_u64("DB_TIMEOUT_MS", 5000)),
            seed_demo: env_flag("FORNO_SEED_DEMO"),
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).ok().as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}
