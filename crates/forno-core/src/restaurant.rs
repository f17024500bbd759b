//! Restaurant entity

use serde::{Deserialize, Serialize};

/// A restaurant. Created only by seeding; the API reads and deletes it.
/// Deleting a restaurant cascades to its [`RestaurantPizza`] rows.
///
/// [`RestaurantPizza`]: crate::RestaurantPizza
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub address: String,
}
