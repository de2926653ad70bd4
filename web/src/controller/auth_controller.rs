use axum::extract::{Query, State};
use axum::response::Response;
use log::*;
use tower_sessions::Session;

use zalo_auth::oauth::{AuthRequest, AuthenticateOptions};

use crate::actions::HostActions;
use crate::error::Result as WebResult;
use crate::{AppState, TowerSession};

/// Starts or completes a Zalo login.
///
/// Without a `code` query parameter the browser is redirected to Zalo's
/// consent page. Zalo redirects back here with `?code=...`, the code is
/// exchanged for tokens, the profile is loaded and the user is stored in the
/// session before redirecting to `LOGIN_SUCCESS_REDIRECT`.
///
/// curl -v --cookie-jar jar --cookie jar http://localhost:4000/auth/zalo
pub async fn authenticate(
    State(app_state): State<AppState>,
    session: Session,
    Query(request): Query<AuthRequest>,
) -> WebResult<Response> {
    trace!("AuthController::authenticate()");

    let mut actions = HostActions::default();
    app_state
        .strategy
        .authenticate(
            &request,
            &TowerSession::new(session.clone()),
            &AuthenticateOptions::default(),
            &mut actions,
        )
        .await;

    actions
        .into_response(&session, &app_state.config.login_success_redirect)
        .await
}
