//! Business logic services
//!
//! Services orchestrate the cache and the database; handlers never touch
//! either directly.

pub mod menu;
pub mod restaurants;

use std::future::Future;
use std::time::Duration;

use forno_core::{Error, Result};

pub use menu::MenuService;
pub use restaurants::RestaurantService;

/// Bound a persistence call. No operation blocks indefinitely; expiry is
/// reported as the store being unavailable.
pub(crate) async fn with_timeout<T>(
    limit: Duration,
    op: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(limit, op).await {
        Ok(result) => result,
        Err(_) => Err(Error::Unavailable("storage operation timed out".into())),
    }
}
