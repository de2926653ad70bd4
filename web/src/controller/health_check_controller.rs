use axum::http::StatusCode;
use axum::response::IntoResponse;

/// GET whether the server is up
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "healthy")
}
