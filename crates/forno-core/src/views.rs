//! Per-endpoint response projections.
//!
//! Each view names its exact field set statically instead of selecting
//! fields ad hoc at serialization time. Handlers only ever serialize views,
//! never raw entities, so an endpoint's wire shape is fixed by its type.

use serde::{Deserialize, Serialize};

use crate::{Pizza, Restaurant, RestaurantPizza};

/// Projection used by `GET /restaurants` and `GET /restaurants/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantView {
    pub id: i64,
    pub name: String,
    pub address: String,
}

impl From<Restaurant> for RestaurantView {
    fn from(r: Restaurant) -> Self {
        Self {
            id: r.id,
            name: r.name,
            address: r.address,
        }
    }
}

/// Projection used by `GET /pizzas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PizzaView {
    pub id: i64,
    pub name: String,
    pub ingredients: Vec<String>,
}

impl From<Pizza> for PizzaView {
    fn from(p: Pizza) -> Self {
        Self {
            id: p.id,
            name: p.name,
            ingredients: p.ingredients,
        }
    }
}

/// Full join representation returned by `POST /restaurant_pizzas`,
/// including nested projections of both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantPizzaView {
    pub id: i64,
    pub price: i64,
    pub restaurant_id: i64,
    pub pizza_id: i64,
    pub restaurant: RestaurantView,
    pub pizza: PizzaView,
}

impl RestaurantPizzaView {
    pub fn new(join: RestaurantPizza, restaurant: Restaurant, pizza: Pizza) -> Self {
        Self {
            id: join.id,
            price: join.price,
            restaurant_id: join.restaurant_id,
            pizza_id: join.pizza_id,
            restaurant: restaurant.into(),
            pizza: pizza.into(),
        }
    }
}
