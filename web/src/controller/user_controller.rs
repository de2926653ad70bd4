use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use log::*;
use tower_sessions::Session;

use crate::controller::ApiResponse;
use crate::error::Result as WebResult;
use crate::verify::SessionUser;

/// GET the logged-in Zalo user.
pub async fn me(Extension(user): Extension<SessionUser>) -> impl IntoResponse {
    debug!("Session user: {}", user.id);
    Json(ApiResponse::new(StatusCode::OK.into(), user))
}

/// Logs the user out by destroying their session.
///
/// curl -v --cookie jar --request POST http://localhost:4000/logout
pub async fn logout(session: Session) -> WebResult<impl IntoResponse> {
    trace!("UserController::logout()");
    session.flush().await?;
    Ok(StatusCode::NO_CONTENT)
}
