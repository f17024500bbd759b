//! HTTP error responses
//!
//! Translates the domain error taxonomy into structured JSON bodies at the
//! handler boundary. Unavailable errors keep their detail in the logs and
//! send a generic message to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use forno_core::Error;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("{entity} not found") })),
            )
                .into_response(),
            Error::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            Error::Unavailable(detail) => {
                tracing::error!("storage unavailable: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "error": "service unavailable" })),
                )
                    .into_response()
            }
        }
    }
}
