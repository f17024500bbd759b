//! Menu service: the pizza catalog and restaurant/pizza price offers

use std::sync::Arc;
use std::time::Duration;

use forno_core::{PizzaView, RestaurantPizzaView, Result};
use tracing::{debug, info};

use super::with_timeout;
use crate::storage::{keys, Database, ReadThrough};

pub struct MenuService {
    db: Arc<Database>,
    cache: ReadThrough,
    db_timeout: Duration,
}

impl MenuService {
    pub fn new(db: Arc<Database>, cache: ReadThrough, db_timeout: Duration) -> Self {
        Self {
            db,
            cache,
            db_timeout,
        }
    }

    pub async fn list_pizzas(&self) -> Result<Vec<PizzaView>> {
        let (views, outcome) = self
            .cache
            .fetch(keys::PIZZAS, || self.list_pizzas_uncached())
            .await?;
        debug!("pizza list served ({:?})", outcome);
        Ok(views)
    }

    /// Create a price offer linking a restaurant to a pizza. Validation and
    /// insert commit atomically in the database; no cached payload derives
    /// data from join rows, so there is nothing to invalidate here.
    pub async fn create_offer(
        &self,
        price: i64,
        restaurant_id: i64,
        pizza_id: i64,
    ) -> Result<RestaurantPizzaView> {
        let (join, restaurant, pizza) = with_timeout(
            self.db_timeout,
            self.db.create_restaurant_pizza(price, restaurant_id, pizza_id),
        )
        .await?;
        info!(
            "created restaurant_pizza {} (restaurant={}, pizza={}, price={})",
            join.id, restaurant_id, pizza_id, price
        );

        Ok(RestaurantPizzaView::new(join, restaurant, pizza))
    }

    async fn list_pizzas_uncached(&self) -> Result<Vec<PizzaView>> {
        let pizzas = with_timeout(self.db_timeout, self.db.list_pizzas()).await?;
        Ok(pizzas.into_iter().map(PizzaView::from).collect())
    }
}
