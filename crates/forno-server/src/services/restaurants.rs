//! Restaurant service

use std::sync::Arc;
use std::time::Duration;

use forno_core::{Error, RestaurantView, Result};
use tracing::{debug, info};

use super::with_timeout;
use crate::storage::{keys, Database, ReadThrough};

pub struct RestaurantService {
    db: Arc<Database>,
    cache: ReadThrough,
    db_timeout: Duration,
}

impl RestaurantService {
    pub fn new(db: Arc<Database>, cache: ReadThrough, db_timeout: Duration) -> Self {
        Self {
            db,
            cache,
            db_timeout,
        }
    }

    pub async fn list(&self) -> Result<Vec<RestaurantView>> {
        let (views, outcome) = self
            .cache
            .fetch(keys::RESTAURANTS, || self.list_uncached())
            .await?;
        debug!("restaurant list served ({:?})", outcome);
        Ok(views)
    }

    pub async fn get(&self, id: i64) -> Result<RestaurantView> {
        let key = keys::restaurant(id);
        let (view, outcome) = self.cache.fetch(&key, || self.get_uncached(id)).await?;
        debug!("restaurant {} served ({:?})", id, outcome);
        Ok(view)
    }

    /// Delete the restaurant (cascading to its join rows), then drop every
    /// cache key derived from it: the individual entry and the collection.
    pub async fn delete(&self, id: i64) -> Result<()> {
        with_timeout(self.db_timeout, self.db.delete_restaurant(id)).await?;
        info!("deleted restaurant {}", id);

        let key = keys::restaurant(id);
        self.cache.invalidate(&[&key, keys::RESTAURANTS]).await;
        Ok(())
    }

    async fn list_uncached(&self) -> Result<Vec<RestaurantView>> {
        let restaurants = with_timeout(self.db_timeout, self.db.list_restaurants()).await?;
        Ok(restaurants.into_iter().map(RestaurantView::from).collect())
    }

    async fn get_uncached(&self, id: i64) -> Result<RestaurantView> {
        with_timeout(self.db_timeout, self.db.get_restaurant(id))
            .await?
            .map(RestaurantView::from)
            .ok_or(Error::NotFound("Restaurant"))
    }
}
