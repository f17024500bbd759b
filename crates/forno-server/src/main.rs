//! Forno Server
//!
//! HTTP CRUD backend for restaurants, pizzas, and their prices. Reads go
//! through a keyed cache when one is configured; writes invalidate the
//! affected keys. Without cache configuration the server degrades to
//! direct database access.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use forno_server::config::{CacheBackend, Config};
use forno_server::services::{MenuService, RestaurantService};
use forno_server::storage::{CacheStore, Database, MemoryCache, ReadThrough, RedisCache};
use forno_server::{router, AppState};

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting forno-server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = Config::from_env();
    info!(
        "Config loaded: bind={}, db={}",
        config.bind_address, config.database_url
    );

    let db = Arc::new(
        Database::connect(&config.database_url)
            .await
            .context("Failed to initialize database")?,
    );

    if config.seed_demo {
        db.seed_demo().await.context("Failed to seed demo data")?;
    }

    let cache = build_cache(&config).await;
    let (ttl, cache_timeout) = config
        .cache
        .as_ref()
        .map(|c| (c.ttl, c.timeout))
        .unwrap_or((Duration::from_secs(60), Duration::from_millis(250)));
    let read_through = ReadThrough::new(cache, ttl, cache_timeout);

    let state = AppState {
        restaurants: Arc::new(RestaurantService::new(
            db.clone(),
            read_through.clone(),
            config.db_timeout,
        )),
        menu: Arc::new(MenuService::new(db, read_through, config.db_timeout)),
    };

    let app = router(state);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Resolve the configured cache backend. An unreachable Redis degrades to
/// running without a cache rather than failing startup.
async fn build_cache(config: &Config) -> Option<Arc<dyn CacheStore>> {
    let cache_config = match &config.cache {
        Some(c) => c,
        None => {
            info!("No cache configured, reads go straight to storage");
            return None;
        }
    };

    match &cache_config.backend {
        CacheBackend::Memory => {
            info!("Using in-memory cache (ttl={:?})", cache_config.ttl);
            Some(Arc::new(MemoryCache::new()))
        }
        CacheBackend::Redis { url } => match RedisCache::connect(url).await {
            Ok(redis) => {
                info!("Connected to redis cache (ttl={:?})", cache_config.ttl);
                Some(Arc::new(redis))
            }
            Err(e) => {
                warn!("Redis unavailable, running without cache: {:#}", e);
                None
            }
        },
    }
}
