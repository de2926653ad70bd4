use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use log::*;
use tower_sessions::Session;

use crate::verify::{SessionUser, USER_SESSION_KEY};

/// Returns 401 Unauthorized unless the session carries a logged-in user.
///
/// The user is handed to the handler as an `Extension<SessionUser>`.
pub async fn require_login(session: Session, mut request: Request, next: Next) -> Response {
    match session.get::<SessionUser>(USER_SESSION_KEY).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
        Err(e) => {
            error!("Failed to load session user: {e:?}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
