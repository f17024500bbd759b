//! Forno Core - Pure domain types for the pizza catalog API
//!
//! This crate contains only data types and the error taxonomy, with no
//! async runtime or storage dependencies.

pub mod error;
pub mod pizza;
pub mod restaurant;
pub mod restaurant_pizza;
pub mod views;

pub use error::{Error, Result};
pub use pizza::Pizza;
pub use restaurant::Restaurant;
pub use restaurant_pizza::{validate_price, RestaurantPizza, PRICE_MAX, PRICE_MIN};
pub use views::{PizzaView, RestaurantPizzaView, RestaurantView};
