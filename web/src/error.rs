use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::*;

use zalo_auth::error::{session_error, Error as AuthError, ErrorKind};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(AuthError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.0.error_kind
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self.0.error_kind {
            ErrorKind::Protocol(kind) => {
                warn!("Zalo login rejected: {:?}", kind);
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED").into_response()
            }
            ErrorKind::Application => {
                warn!("Zalo login rejected by verification: {:?}", self.0.source);
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED").into_response()
            }
            ErrorKind::Transport(kind) => {
                error!("Zalo unreachable: {:?} {:?}", kind, self.0.source);
                (StatusCode::BAD_GATEWAY, "BAD GATEWAY").into_response()
            }
            ErrorKind::Config(_) | ErrorKind::Session => {
                error!("Login failed: {:?}", self.0);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
        }
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl From<tower_sessions::session::Error> for Error {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self(session_error(Box::new(err)))
    }
}
