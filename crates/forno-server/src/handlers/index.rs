//! Landing page and not-found fallback

use axum::http::StatusCode;
use axum::response::Html;

const LANDING: &str = "<h1>Code challenge</h1>";

pub async fn index() -> Html<&'static str> {
    Html(LANDING)
}

/// Unmatched routes get the landing markup with a 404 status.
pub async fn fallback() -> (StatusCode, Html<&'static str>) {
    (StatusCode::NOT_FOUND, Html(LANDING))
}
