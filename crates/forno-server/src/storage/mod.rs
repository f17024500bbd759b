//! Storage layer
//!
//! SQLite (embedded) owns all durable state. Cached copies live behind the
//! [`CacheStore`] trait with an in-memory (DashMap) and a Redis backend;
//! on any conflict the database wins and the cache entry is discarded.

pub mod cache;
pub mod db;
pub mod memory;
pub mod redis;

pub use cache::{keys, CacheError, CacheResult, CacheStore, ReadOutcome, ReadThrough};
pub use db::Database;
pub use memory::MemoryCache;
pub use self::redis::RedisCache;
