//! Type guards for JSON bodies returned by the provider.

use serde_json::{Map, Value};

use crate::error::{provider_error, Error, ErrorKind, ProtocolErrorKind, TransportErrorKind};

/// Parse a response body that must be a JSON object.
///
/// A body that is not JSON at all is a transport failure; JSON that is not an
/// object means the provider answered with something we cannot interpret.
pub(crate) fn parse_object(body: &str) -> Result<Map<String, Value>, Error> {
    let value: Value = serde_json::from_str(body).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: ErrorKind::Transport(TransportErrorKind::MalformedBody),
    })?;

    match value {
        Value::Object(object) => Ok(object),
        other => Err(provider_error(ProtocolErrorKind::InvalidResponse, other)),
    }
}

/// Whether the provider flagged this object as an error.
///
/// Zalo includes `"error": 0` in some successful responses, so only a
/// present, non-null, non-zero `error` member counts.
pub(crate) fn reports_error(object: &Map<String, Value>) -> bool {
    match object.get("error") {
        None | Some(Value::Null) => false,
        Some(Value::Number(n)) => n.as_i64() != Some(0),
        Some(_) => true,
    }
}
