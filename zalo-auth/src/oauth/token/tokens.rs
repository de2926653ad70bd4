//! OAuth token types.

use secrecy::SecretString;
use serde_json::{Map, Value};

use crate::error::Error;

/// Tokens issued by a successful authorization code exchange.
///
/// Lives only for the duration of one flow; nothing here is persisted.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    /// Access token for the profile API.
    pub access_token: SecretString,
    /// Refresh token, when the provider issued one.
    pub refresh_token: Option<SecretString>,
    /// The complete response object, including provider-specific members
    /// such as `expires_in`.
    pub raw: Map<String, Value>,
}

/// Outcome of a token exchange: a grant, or the failure as data.
pub type TokenResult = Result<TokenGrant, Error>;

impl TokenGrant {
    /// Seconds until the access token expires, when the provider said so.
    ///
    /// Zalo sends `expires_in` as a string; standard providers send a number.
    pub fn expires_in(&self) -> Option<u64> {
        match self.raw.get("expires_in")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}
