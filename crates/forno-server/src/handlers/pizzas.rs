//! Pizza handlers

use axum::{extract::State, Json};
use forno_core::PizzaView;

use crate::error::ApiError;
use crate::AppState;

/// `GET /pizzas`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PizzaView>>, ApiError> {
    Ok(Json(state.menu.list_pizzas().await?))
}
