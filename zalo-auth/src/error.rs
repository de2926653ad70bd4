//! Error types for the `zalo-auth` crate.
//! A root Error struct holds an error kind and an optional source for chaining.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for zalo-auth crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in zalo-auth.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// Invalid strategy configuration. Only ever returned at construction.
    Config(ConfigErrorKind),
    /// The provider answered, but refused or garbled the exchange.
    Protocol(ProtocolErrorKind),
    /// The provider could not be reached or answered with an unreadable body.
    Transport(TransportErrorKind),
    /// The application's verification callback rejected the identity.
    Application,
    /// The host session store failed.
    Session,
}

/// Errors from strategy configuration.
#[derive(Debug, PartialEq)]
pub enum ConfigErrorKind {
    MissingAppId,
    MissingAppSecret,
    MissingCallbackUrl,
    InvalidUrl,
    InvalidVerifierLength,
}

/// Errors reported by the provider during the OAuth round trip.
#[derive(Debug, PartialEq)]
pub enum ProtocolErrorKind {
    TokenRejected,
    ProfileRejected,
    MissingVerifier,
    InvalidResponse,
}

/// Errors from HTTP transport operations.
#[derive(Debug, PartialEq)]
pub enum TransportErrorKind {
    BuilderFailed,
    RequestFailed,
    Timeout,
    Network,
    MalformedBody,
}

/// Error payload returned by the identity provider.
///
/// Kept as the source of protocol errors so the host framework's failure
/// channel receives exactly what the provider said.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderError {
    pub payload: serde_json::Value,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "provider error: {}", self.payload)
    }
}

impl StdError for ProviderError {}

impl Error {
    /// The provider's error payload, if this error carries one.
    pub fn provider_payload(&self) -> Option<&serde_json::Value> {
        self.source
            .as_ref()
            .and_then(|e| e.downcast_ref::<ProviderError>())
            .map(|e| &e.payload)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Config(kind) => write!(f, "Configuration error: {:?}", kind),
            ErrorKind::Protocol(kind) => write!(f, "OAuth protocol error: {:?}", kind),
            ErrorKind::Transport(kind) => write!(f, "Transport error: {:?}", kind),
            ErrorKind::Application => write!(f, "Verification rejected the identity"),
            ErrorKind::Session => write!(f, "Session store error"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let error_kind = if err.is_timeout() {
            ErrorKind::Transport(TransportErrorKind::Timeout)
        } else if err.is_builder() {
            ErrorKind::Transport(TransportErrorKind::BuilderFailed)
        } else if err.is_decode() || err.is_body() {
            ErrorKind::Transport(TransportErrorKind::MalformedBody)
        } else if err.is_request() {
            ErrorKind::Transport(TransportErrorKind::RequestFailed)
        } else {
            ErrorKind::Transport(TransportErrorKind::Network)
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<reqwest_middleware::Error> for Error {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(err) => err.into(),
            other => Error {
                source: Some(Box::new(other)),
                error_kind: ErrorKind::Transport(TransportErrorKind::Network),
            },
        }
    }
}

/// Helper function to create configuration errors.
pub fn config_error(kind: ConfigErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Config(kind),
    }
}

/// Helper function to create protocol errors.
pub fn protocol_error(kind: ProtocolErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Protocol(kind),
    }
}

/// Helper function to create protocol errors carrying the provider's payload.
pub fn provider_error(kind: ProtocolErrorKind, payload: serde_json::Value) -> Error {
    Error {
        source: Some(Box::new(ProviderError { payload })),
        error_kind: ErrorKind::Protocol(kind),
    }
}

/// Helper function to create transport errors.
pub fn transport_error(kind: TransportErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::Transport(kind),
    }
}

/// Helper function to wrap an application rejection.
pub fn application_error(source: Box<dyn StdError + Send + Sync>) -> Error {
    Error {
        source: Some(source),
        error_kind: ErrorKind::Application,
    }
}

/// Helper function to wrap a session store failure.
pub fn session_error(source: Box<dyn StdError + Send + Sync>) -> Error {
    Error {
        source: Some(source),
        error_kind: ErrorKind::Session,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_payload_recovered() {
        let err = provider_error(
            ProtocolErrorKind::TokenRejected,
            json!({ "error": "invalid_grant" }),
        );

        assert_eq!(
            err.error_kind,
            ErrorKind::Protocol(ProtocolErrorKind::TokenRejected)
        );
        assert_eq!(
            err.provider_payload(),
            Some(&json!({ "error": "invalid_grant" }))
        );
    }

    #[test]
    fn test_message_errors_have_no_payload() {
        let err = protocol_error(ProtocolErrorKind::MissingVerifier, "no verifier");
        assert!(err.provider_payload().is_none());
        assert_eq!(err.to_string(), "OAuth protocol error: MissingVerifier");
    }
}
