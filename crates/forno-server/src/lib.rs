//! Forno Server
//!
//! HTTP CRUD backend exposing restaurants, pizzas, and their pricing
//! relationships, backed by SQLite with a read-through cache in front of
//! reads. The router is exposed here so integration tests can drive it
//! directly without binding a socket.

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;
pub mod storage;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use services::{MenuService, RestaurantService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub restaurants: Arc<RestaurantService>,
    pub menu: Arc<MenuService>,
}

/// Build the HTTP router. One verb+path pair per handler; everything
/// unmatched falls through to the landing fallback.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index::index))
        .route("/health", get(handlers::health::health))
        .route("/restaurants", get(handlers::restaurants::list))
        .route(
            "/restaurants/:id",
            get(handlers::restaurants::get).delete(handlers::restaurants::delete),
        )
        .route("/pizzas", get(handlers::pizzas::list))
        .route("/restaurant_pizzas", post(handlers::restaurant_pizzas::create))
        .fallback(handlers::index::fallback)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
