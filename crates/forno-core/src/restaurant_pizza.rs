//! RestaurantPizza join entity

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lowest price a restaurant may charge for a pizza.
pub const PRICE_MIN: i64 = 1;
/// Highest price a restaurant may charge for a pizza.
pub const PRICE_MAX: i64 = 30;

/// "This restaurant offers this pizza at this price."
///
/// Created through the API, never updated, deleted only as a cascade side
/// effect of deleting the owning restaurant. Both foreign ids must resolve
/// to existing rows at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantPizza {
    pub id: i64,
    pub price: i64,
    pub restaurant_id: i64,
    pub pizza_id: i64,
}

/// Check the price domain constraint. Out-of-range values are rejected,
/// never clamped.
pub fn validate_price(price: i64) -> Result<()> {
    if (PRICE_MIN..=PRICE_MAX).contains(&price) {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "Price must be between {PRICE_MIN} and {PRICE_MAX}"
        )))
    }
}
