//! RestaurantPizza handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use forno_core::{Error, RestaurantPizzaView};
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRestaurantPizzaRequest {
    price: Option<i64>,
    pizza_id: Option<i64>,
    restaurant_id: Option<i64>,
}

/// `POST /restaurant_pizzas`: validates the body shape here, before
/// persistence is touched; domain and referential checks happen inside the
/// database transaction.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateRestaurantPizzaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RestaurantPizzaView>), ApiError> {
    let Json(req) = body.map_err(|rejection| Error::validation(rejection.body_text()))?;

    let mut errors = Vec::new();
    if req.price.is_none() {
        errors.push("price is required".to_string());
    }
    if req.pizza_id.is_none() {
        errors.push("pizza_id is required".to_string());
    }
    if req.restaurant_id.is_none() {
        errors.push("restaurant_id is required".to_string());
    }
    let (Some(price), Some(pizza_id), Some(restaurant_id)) =
        (req.price, req.pizza_id, req.restaurant_id)
    else {
        return Err(Error::Validation(errors).into());
    };

    let view = state.menu.create_offer(price, restaurant_id, pizza_id).await?;
    Ok((StatusCode::CREATED, Json(view)))
}
