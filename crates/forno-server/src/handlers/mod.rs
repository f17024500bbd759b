//! HTTP handlers

pub mod health;
pub mod index;
pub mod pizzas;
pub mod restaurant_pizzas;
pub mod restaurants;
