//! HTTP client used to reach the identity provider.

use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::RetryTransientMiddleware;

use super::BackoffPolicy;
use crate::error::Error;

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpClientConfig {
    /// Request timeout. A timed-out exchange surfaces as a transport failure.
    pub timeout: Duration,
    /// Maximum number of retries for idempotent requests.
    pub max_retries: u32,
    /// User agent string.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 2,
            user_agent: format!("zalo-auth/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Provider HTTP client.
///
/// Holds two views over the same connection pool: a plain client for the
/// token exchange, which must never be replayed because authorization codes are
/// single use, and a retrying client for idempotent reads.
#[derive(Clone)]
pub struct ProviderClient {
    plain: reqwest::Client,
    retrying: ClientWithMiddleware,
}

impl ProviderClient {
    /// Build a client from the given configuration.
    pub fn new(config: &HttpClientConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        let retry_policy = BackoffPolicy::new(config.max_retries);
        let retrying = ClientBuilder::new(client.clone())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            plain: client,
            retrying,
        })
    }

    /// Client without retries, for non-idempotent requests.
    pub fn plain(&self) -> &reqwest::Client {
        &self.plain
    }

    /// Client retrying transient failures, for idempotent requests.
    pub fn retrying(&self) -> &ClientWithMiddleware {
        &self.retrying
    }
}
