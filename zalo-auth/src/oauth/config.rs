//! Strategy configuration, validated once at construction.

use secrecy::SecretString;
use url::Url;

use super::pkce::{DEFAULT_VERIFIER_LENGTH, VERIFIER_LENGTH_RANGE};
use crate::error::{config_error, ConfigErrorKind, Error};
use crate::http::HttpClientConfig;
use crate::providers::{ProviderUrls, DEFAULT_FIELDS};

/// Immutable configuration of a [`Strategy`](super::Strategy).
///
/// Obtained only through [`StrategyConfig::builder`], so holding one means
/// every required option was supplied and every URL parsed.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    app_id: String,
    app_secret: SecretString,
    callback_url: Url,
    state: Option<String>,
    fields: Vec<String>,
    verifier_length: usize,
    auth_url: Url,
    token_url: Url,
    profile_url: Url,
    http: HttpClientConfig,
}

impl StrategyConfig {
    /// Start building a configuration.
    pub fn builder() -> StrategyConfigBuilder {
        StrategyConfigBuilder::default()
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn app_secret(&self) -> &SecretString {
        &self.app_secret
    }

    /// Registered redirect URI the provider calls back.
    pub fn callback_url(&self) -> &Url {
        &self.callback_url
    }

    /// Opaque `state` value passed through the authorization request.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Profile fields requested when no per-invocation override is given.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn verifier_length(&self) -> usize {
        self.verifier_length
    }

    pub fn auth_url(&self) -> &Url {
        &self.auth_url
    }

    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    pub fn profile_url(&self) -> &Url {
        &self.profile_url
    }

    pub fn http(&self) -> &HttpClientConfig {
        &self.http
    }
}

/// Builder for [`StrategyConfig`].
#[derive(Debug, Default)]
pub struct StrategyConfigBuilder {
    app_id: Option<String>,
    app_secret: Option<String>,
    callback_url: Option<String>,
    state: Option<String>,
    fields: Option<Vec<String>>,
    verifier_length: Option<usize>,
    urls: Option<ProviderUrls>,
    http: Option<HttpClientConfig>,
}

impl StrategyConfigBuilder {
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn app_secret(mut self, app_secret: impl Into<String>) -> Self {
        self.app_secret = Some(app_secret.into());
        self
    }

    pub fn callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn verifier_length(mut self, verifier_length: usize) -> Self {
        self.verifier_length = Some(verifier_length);
        self
    }

    /// Override the provider endpoints (defaults to Zalo's).
    pub fn urls(mut self, urls: ProviderUrls) -> Self {
        self.urls = Some(urls);
        self
    }

    pub fn http(mut self, http: HttpClientConfig) -> Self {
        self.http = Some(http);
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<StrategyConfig, Error> {
        let app_id = required(self.app_id).ok_or_else(|| {
            config_error(ConfigErrorKind::MissingAppId, "an app_id option is required")
        })?;
        let app_secret = required(self.app_secret).ok_or_else(|| {
            config_error(
                ConfigErrorKind::MissingAppSecret,
                "an app_secret option is required",
            )
        })?;
        let callback_url = required(self.callback_url).ok_or_else(|| {
            config_error(
                ConfigErrorKind::MissingCallbackUrl,
                "a callback URL option is required",
            )
        })?;

        let verifier_length = self.verifier_length.unwrap_or(DEFAULT_VERIFIER_LENGTH);
        if !VERIFIER_LENGTH_RANGE.contains(&verifier_length) {
            return Err(config_error(
                ConfigErrorKind::InvalidVerifierLength,
                &format!(
                    "PKCE verifier length {} is outside {}..={}",
                    verifier_length,
                    VERIFIER_LENGTH_RANGE.start(),
                    VERIFIER_LENGTH_RANGE.end()
                ),
            ));
        }

        let urls = self.urls.unwrap_or_default();
        let fields = self
            .fields
            .unwrap_or_else(|| DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect());

        Ok(StrategyConfig {
            app_id,
            app_secret: SecretString::new(app_secret),
            callback_url: parse_url("callback_url", &callback_url)?,
            state: self.state.filter(|s| !s.is_empty()),
            fields,
            verifier_length,
            auth_url: parse_url("auth_url", &urls.auth_url)?,
            token_url: parse_url("token_url", &urls.token_url)?,
            profile_url: parse_url("profile_url", &urls.profile_url)?,
            http: self.http.unwrap_or_default(),
        })
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_url(name: &str, value: &str) -> Result<Url, Error> {
    Url::parse(value).map_err(|e| {
        config_error(
            ConfigErrorKind::InvalidUrl,
            &format!("{} is not a valid URL: {}", name, e),
        )
    })
}
