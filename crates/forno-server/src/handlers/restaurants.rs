//! Restaurant handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use forno_core::RestaurantView;

use crate::error::ApiError;
use crate::AppState;

/// `GET /restaurants`: the bare array, no envelope object.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<RestaurantView>>, ApiError> {
    Ok(Json(state.restaurants.list().await?))
}

/// `GET /restaurants/:id`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RestaurantView>, ApiError> {
    Ok(Json(state.restaurants.get(id).await?))
}

/// `DELETE /restaurants/:id`: 204 with an empty body on success, so a
/// repeat delete unambiguously reads as 404.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.restaurants.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
