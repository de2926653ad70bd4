//! Turns the login flow's outcome into an HTTP response.

use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;
use url::Url;

use zalo_auth::error::Error as AuthError;
use zalo_auth::oauth::Actions;

use crate::error::Result;
use crate::verify::{SessionUser, USER_SESSION_KEY};

/// Collects the single outcome reported by the strategy.
#[derive(Default)]
pub(crate) struct HostActions {
    redirect: Option<Url>,
    user: Option<SessionUser>,
    error: Option<AuthError>,
}

impl Actions<SessionUser> for HostActions {
    fn redirect(&mut self, url: Url) {
        self.redirect = Some(url);
    }

    fn success(&mut self, user: SessionUser) {
        self.user = Some(user);
    }

    fn fail(&mut self, error: AuthError) {
        self.error = Some(error);
    }
}

impl HostActions {
    /// Builds the response, logging the user in on success.
    pub(crate) async fn into_response(
        self,
        session: &Session,
        success_redirect: &str,
    ) -> Result<Response> {
        if let Some(error) = self.error {
            return Err(error.into());
        }

        if let Some(user) = self.user {
            // New identity, new session id.
            session.cycle_id().await?;
            session.insert(USER_SESSION_KEY, user).await?;
            return Ok(Redirect::to(success_redirect).into_response());
        }

        match self.redirect {
            Some(url) => Ok(Redirect::temporary(url.as_str()).into_response()),
            None => Err(zalo_auth::error::protocol_error(
                zalo_auth::error::ProtocolErrorKind::InvalidResponse,
                "login flow reported no outcome",
            )
            .into()),
        }
    }
}
