//! The Zalo login strategy: decides whether a request starts the flow or
//! completes it, and drives the components in order.

use std::error::Error as StdError;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use super::authorize::authorization_url;
use super::config::StrategyConfig;
use super::profile::{Profile, ProfileFetcher};
use super::session::{Session, SessionBinder};
use super::token::TokenExchanger;
use crate::error::{application_error, protocol_error, Error, ProtocolErrorKind};
use crate::http::ProviderClient;

/// Inbound request as seen by the strategy.
///
/// Deserializes from the callback's query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub code: Option<String>,
    /// The `state` Zalo echoes back. Informational only: the strategy never
    /// compares it against the configured value.
    #[serde(default)]
    pub state: Option<String>,
}

impl AuthRequest {
    /// Request carrying an authorization code.
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            state: None,
        }
    }

    /// Parse the request from a raw query string.
    pub fn from_query(query: &str) -> Self {
        let mut request = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "code" => request.code = Some(value.into_owned()),
                "state" => request.state = Some(value.into_owned()),
                _ => {}
            }
        }
        request
    }

    /// The authorization code, treating an empty value as absent.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.is_empty())
    }
}

/// Options for a single call to [`Strategy::authenticate`].
#[derive(Debug, Clone, Default)]
pub struct AuthenticateOptions {
    /// Profile fields for this flow only; the configured list applies otherwise.
    pub fields: Option<Vec<String>>,
}

/// Result-reporting capability supplied by the host framework.
///
/// Exactly one of these is called per [`Strategy::authenticate`].
pub trait Actions<U> {
    /// Send the browser to `url`.
    fn redirect(&mut self, url: Url);
    /// The user authenticated as `user`.
    fn success(&mut self, user: U);
    /// Authentication failed.
    fn fail(&mut self, error: Error);
}

/// Application-supplied mapping from provider credentials to a local identity.
#[async_trait]
pub trait Verify: Send + Sync {
    /// The application's user identity.
    type User: Send;

    /// Resolve the identity, or reject it with an application error.
    async fn verify(
        &self,
        access_token: &SecretString,
        refresh_token: Option<&SecretString>,
        profile: Profile,
        session: &dyn Session,
    ) -> Result<Self::User, Box<dyn StdError + Send + Sync>>;
}

/// Terminal result of one strategy invocation.
#[derive(Debug)]
pub enum Outcome<U> {
    Redirect(Url),
    Success(U),
    Fail(Error),
}

impl<U> Outcome<U> {
    /// Report this outcome through the host's capability set.
    pub fn dispatch<A: Actions<U> + ?Sized>(self, actions: &mut A) {
        match self {
            Outcome::Redirect(url) => actions.redirect(url),
            Outcome::Success(user) => actions.success(user),
            Outcome::Fail(error) => actions.fail(error),
        }
    }
}

/// Zalo OAuth 2.0 authorization code strategy with PKCE.
///
/// A strategy is immutable after construction, so one instance can serve any
/// number of concurrent flows; per-flow data lives in the session and in the
/// call's [`AuthenticateOptions`].
pub struct Strategy<V: Verify> {
    config: StrategyConfig,
    verify: V,
    binder: SessionBinder,
    exchanger: TokenExchanger,
    fetcher: ProfileFetcher,
}

impl<V: Verify> Strategy<V> {
    /// Name under which hosts register this strategy.
    pub const NAME: &'static str = "zalo";

    /// Create a strategy from a validated configuration and a verification callback.
    pub fn new(config: StrategyConfig, verify: V) -> Result<Self, Error> {
        let client = ProviderClient::new(config.http())?;

        Ok(Self {
            binder: SessionBinder::new(config.verifier_length()),
            exchanger: TokenExchanger::new(client.plain().clone()),
            fetcher: ProfileFetcher::new(client.retrying().clone()),
            config,
            verify,
        })
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Authenticate `request`, reporting exactly once through `actions`.
    pub async fn authenticate<A>(
        &self,
        request: &AuthRequest,
        session: &dyn Session,
        options: &AuthenticateOptions,
        actions: &mut A,
    ) where
        A: Actions<V::User> + Send + ?Sized,
    {
        self.resolve(request, session, options)
            .await
            .dispatch(actions);
    }

    /// Run the flow for `request` and return its terminal outcome.
    pub async fn resolve(
        &self,
        request: &AuthRequest,
        session: &dyn Session,
        options: &AuthenticateOptions,
    ) -> Outcome<V::User> {
        let fields = options
            .fields
            .as_deref()
            .unwrap_or_else(|| self.config.fields());

        let result = match request.code() {
            None => self.start(session).await.map(Outcome::Redirect),
            Some(code) => self.complete(code, session, fields).await.map(Outcome::Success),
        };

        result.unwrap_or_else(Outcome::Fail)
    }

    /// Forget the PKCE pair bound to `session`, so the next flow binds a new one.
    pub async fn reset(&self, session: &dyn Session) -> Result<(), Error> {
        session.clear_pkce().await
    }

    async fn start(&self, session: &dyn Session) -> Result<Url, Error> {
        debug!("No authorization code present, starting authorization");

        let pair = self.binder.get_or_create(session).await?;
        Ok(authorization_url(
            self.config.auth_url(),
            &self.config,
            &pair.challenge,
        ))
    }

    async fn complete(
        &self,
        code: &str,
        session: &dyn Session,
        fields: &[String],
    ) -> Result<V::User, Error> {
        debug!("Authorization code received, completing authorization");

        let pair = session.pkce().await?.ok_or_else(|| {
            warn!("Authorization code received but no PKCE verifier is bound to the session");
            protocol_error(
                ProtocolErrorKind::MissingVerifier,
                "no PKCE verifier bound to the session",
            )
        })?;

        let grant = self
            .exchanger
            .exchange(code, &pair.verifier, &self.config, self.config.token_url())
            .await?;

        let profile = self
            .fetcher
            .fetch_profile(&grant, fields, self.config.profile_url())
            .await?;

        let user = self
            .verify
            .verify(
                &grant.access_token,
                grant.refresh_token.as_ref(),
                profile,
                session,
            )
            .await
            .map_err(|e| {
                warn!("Verification rejected the identity: {}", e);
                application_error(e)
            })?;

        info!("Zalo authentication succeeded");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::oauth::session::MemorySession;

    struct AcceptAll;

    #[async_trait]
    impl Verify for AcceptAll {
        type User = String;

        async fn verify(
            &self,
            _access_token: &SecretString,
            _refresh_token: Option<&SecretString>,
            profile: Profile,
            _session: &dyn Session,
        ) -> Result<String, Box<dyn StdError + Send + Sync>> {
            Ok(profile.str_field("id").unwrap_or_default().to_string())
        }
    }

    fn strategy() -> Strategy<AcceptAll> {
        let config = StrategyConfig::builder()
            .app_id("app")
            .app_secret("secret")
            .callback_url("https://example.com/cb")
            .build()
            .unwrap();
        Strategy::new(config, AcceptAll).unwrap()
    }

    #[test]
    fn test_auth_request_from_query() {
        let request = AuthRequest::from_query("code=abc%20d&state=xyz&other=1");
        assert_eq!(request.code(), Some("abc d"));
        assert_eq!(request.state.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_empty_code_is_absent() {
        assert_eq!(AuthRequest::from_query("code=").code(), None);
        assert_eq!(AuthRequest::default().code(), None);
    }

    #[test]
    fn test_strategy_name() {
        assert_eq!(strategy().name(), "zalo");
    }

    #[tokio::test]
    async fn test_request_state_does_not_change_redirect() {
        let config = StrategyConfig::builder()
            .app_id("app")
            .app_secret("secret")
            .callback_url("https://example.com/cb")
            .state("configured")
            .build()
            .unwrap();
        let strategy = Strategy::new(config, AcceptAll).unwrap();
        let session = MemorySession::new();

        let outcome = strategy
            .resolve(
                &AuthRequest::from_query("state=echoed"),
                &session,
                &AuthenticateOptions::default(),
            )
            .await;

        match outcome {
            Outcome::Redirect(url) => {
                let state = url
                    .query_pairs()
                    .find(|(key, _)| key == "state")
                    .map(|(_, value)| value.into_owned());
                assert_eq!(state.as_deref(), Some("configured"));
            }
            other => panic!("expected redirect, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_start_reuses_bound_pair() {
        let strategy = strategy();
        let session = MemorySession::new();
        let options = AuthenticateOptions::default();

        let first = strategy
            .resolve(&AuthRequest::default(), &session, &options)
            .await;
        let second = strategy
            .resolve(&AuthRequest::default(), &session, &options)
            .await;

        match (first, second) {
            (Outcome::Redirect(a), Outcome::Redirect(b)) => assert_eq!(a, b),
            other => panic!("expected two redirects, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reset_binds_new_pair() {
        let strategy = strategy();
        let session = MemorySession::new();
        let options = AuthenticateOptions::default();

        let first = strategy
            .resolve(&AuthRequest::default(), &session, &options)
            .await;
        strategy.reset(&session).await.unwrap();
        let second = strategy
            .resolve(&AuthRequest::default(), &session, &options)
            .await;

        match (first, second) {
            (Outcome::Redirect(a), Outcome::Redirect(b)) => assert_ne!(a, b),
            other => panic!("expected two redirects, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_code_without_bound_pair_fails() {
        let strategy = strategy();
        let session = MemorySession::new();

        let outcome = strategy
            .resolve(
                &AuthRequest::with_code("abc"),
                &session,
                &AuthenticateOptions::default(),
            )
            .await;

        match outcome {
            Outcome::Fail(err) => assert_eq!(
                err.error_kind,
                ErrorKind::Protocol(ProtocolErrorKind::MissingVerifier)
            ),
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
