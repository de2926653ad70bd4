//! Authorization code for token exchange, proven with the PKCE verifier.

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use url::Url;

use super::{TokenGrant, TokenResult};
use crate::error::{provider_error, Error, ErrorKind, ProtocolErrorKind, TransportErrorKind};
use crate::oauth::config::StrategyConfig;
use crate::oauth::pkce::PkceVerifier;
use crate::oauth::response::{parse_object, reports_error};

/// Header carrying the application secret, keeping it out of the request body.
pub const SECRET_KEY_HEADER: &str = "secret_key";

/// Exchanges an authorization code for tokens.
#[derive(Debug, Clone)]
pub struct TokenExchanger {
    client: reqwest::Client,
}

impl TokenExchanger {
    /// Create an exchanger over a client that does not retry.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Exchange `code` for tokens at `token_endpoint`, presenting `verifier`.
    ///
    /// Every failure, including unreachable endpoints and unreadable bodies,
    /// comes back as `Err` data; nothing here panics.
    pub async fn exchange(
        &self,
        code: &str,
        verifier: &PkceVerifier,
        config: &StrategyConfig,
        token_endpoint: &Url,
    ) -> TokenResult {
        debug!("Exchanging authorization code for tokens");

        match self.send(code, verifier, config, token_endpoint).await {
            Ok(grant) => {
                info!("Successfully exchanged authorization code for tokens");
                Ok(grant)
            }
            Err(e) => {
                warn!("Token exchange failed: {}", e);
                Err(e)
            }
        }
    }

    async fn send(
        &self,
        code: &str,
        verifier: &PkceVerifier,
        config: &StrategyConfig,
        token_endpoint: &Url,
    ) -> TokenResult {
        let form = [
            ("app_id", config.app_id()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("code_verifier", verifier.as_str()),
        ];

        let response = self
            .client
            .post(token_endpoint.clone())
            .header(SECRET_KEY_HEADER, secret_header(config.app_secret())?)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let object = parse_object(&body)?;

        grant_from_response(status.is_success(), object)
    }
}

fn secret_header(secret: &SecretString) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(secret.expose_secret()).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: ErrorKind::Transport(TransportErrorKind::BuilderFailed),
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Turn a parsed token response into a grant, guarding its shape.
fn grant_from_response(success_status: bool, object: Map<String, Value>) -> TokenResult {
    if reports_error(&object) {
        return Err(provider_error(
            ProtocolErrorKind::TokenRejected,
            Value::Object(object),
        ));
    }

    let access_token = match non_empty_str(&object, "access_token") {
        Some(token) => SecretString::new(token.to_string()),
        None if success_status => {
            return Err(provider_error(
                ProtocolErrorKind::InvalidResponse,
                Value::Object(object),
            ))
        }
        None => {
            return Err(provider_error(
                ProtocolErrorKind::TokenRejected,
                Value::Object(object),
            ))
        }
    };
    let refresh_token =
        non_empty_str(&object, "refresh_token").map(|t| SecretString::new(t.to_string()));

    Ok(TokenGrant {
        access_token,
        refresh_token,
        raw: object,
    })
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
