//! Retrieval of the user's profile with an issued access token.

use std::ops::Deref;

use reqwest::header::HeaderValue;
use reqwest_middleware::ClientWithMiddleware;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use super::response::{parse_object, reports_error};
use super::token::TokenGrant;
use crate::error::{provider_error, Error, ErrorKind, ProtocolErrorKind, TransportErrorKind};

/// Header duplicating the access token; the Graph API honours either place.
pub const ACCESS_TOKEN_HEADER: &str = "access_token";

/// User profile keyed by the requested field names.
///
/// The schema belongs to the provider; interpreting it is left to the
/// application's verification callback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(Map<String, Value>);

impl Profile {
    /// String value of a top-level field.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }
}

impl Deref for Profile {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Outcome of a profile fetch: the profile, or the failure as data.
pub type ProfileResult = Result<Profile, Error>;

/// Fetches user profiles from the provider's Graph API.
#[derive(Clone)]
pub struct ProfileFetcher {
    client: ClientWithMiddleware,
}

impl ProfileFetcher {
    /// Create a fetcher; the request is idempotent so the client may retry.
    pub fn new(client: ClientWithMiddleware) -> Self {
        Self { client }
    }

    /// Fetch the profile fields `fields` for the holder of `grant`.
    pub async fn fetch_profile(
        &self,
        grant: &TokenGrant,
        fields: &[String],
        profile_endpoint: &Url,
    ) -> ProfileResult {
        debug!("Fetching user profile ({} fields)", fields.len());

        let result = self.send(grant, fields, profile_endpoint).await;
        if let Err(e) = &result {
            warn!("Profile fetch failed: {}", e);
        }
        result
    }

    async fn send(
        &self,
        grant: &TokenGrant,
        fields: &[String],
        profile_endpoint: &Url,
    ) -> ProfileResult {
        let access_token = grant.access_token.expose_secret();
        let mut token_header = HeaderValue::from_str(access_token).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Transport(TransportErrorKind::BuilderFailed),
        })?;
        token_header.set_sensitive(true);

        let response = self
            .client
            .get(profile_request_url(profile_endpoint, access_token, fields))
            .header(ACCESS_TOKEN_HEADER, token_header)
            .send()
            .await?;

        let body = response.text().await?;
        let object = parse_object(&body)?;

        if reports_error(&object) {
            return Err(provider_error(
                ProtocolErrorKind::ProfileRejected,
                Value::Object(object),
            ));
        }

        Ok(Profile(object))
    }
}

/// Profile URL carrying `access_token` and the comma-joined `fields`.
pub fn profile_request_url(profile_endpoint: &Url, access_token: &str, fields: &[String]) -> Url {
    let mut url = profile_endpoint.clone();
    url.query_pairs_mut()
        .append_pair("access_token", access_token)
        .append_pair("fields", &fields.join(","));
    url
}
