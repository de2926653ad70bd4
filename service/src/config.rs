use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::time::Duration;
use zalo_auth::http::HttpClientConfig;
use zalo_auth::oauth::{StrategyConfig, DEFAULT_VERIFIER_LENGTH};
use zalo_auth::providers::{
    zalo_urls, ProviderUrls, ZALO_AUTH_URL, ZALO_PROFILE_URL, ZALO_TOKEN_URL,
};
use zalo_auth::Error;

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The Zalo application ID issued by the Zalo developer console.
    #[arg(long, env)]
    zalo_app_id: Option<String>,

    /// The Zalo application secret. Sent to Zalo only in the `secret_key` header.
    #[arg(long, env, hide_env_values = true)]
    zalo_app_secret: Option<String>,

    /// The callback URL registered with Zalo, e.g. https://example.com/auth/zalo/callback
    #[arg(long, env)]
    zalo_callback_url: Option<String>,

    /// Opaque state value passed through the authorization request.
    #[arg(long, env)]
    zalo_state: Option<String>,

    /// Comma separated list of profile fields to request from the Graph API.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "id,birthday,name,gender,picture"
    )]
    pub zalo_fields: Vec<String>,

    /// Zalo authorization (consent) endpoint.
    #[arg(long, env, default_value = ZALO_AUTH_URL)]
    zalo_auth_url: String,

    /// Zalo token endpoint.
    #[arg(long, env, default_value = ZALO_TOKEN_URL)]
    zalo_token_url: String,

    /// Zalo Graph API profile endpoint.
    #[arg(long, env, default_value = ZALO_PROFILE_URL)]
    zalo_profile_url: String,

    /// Length of generated PKCE code verifiers (43 to 128).
    #[arg(long, env, default_value_t = DEFAULT_VERIFIER_LENGTH)]
    pub pkce_verifier_length: usize,

    /// Timeout in seconds for each request to Zalo
    #[arg(long, env, default_value_t = 30)]
    pub http_timeout_secs: u64,

    /// Maximum retries for idempotent requests to Zalo
    #[arg(long, env, default_value_t = 2)]
    pub http_max_retries: u32,

    /// Where the browser is sent after a successful login
    #[arg(long, env, default_value = "/me")]
    pub login_success_redirect: String,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Session expiry duration in seconds of inactivity (default: 1 hour)
    #[arg(long, env, default_value_t = 3600)]
    pub session_expiry_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn set_zalo_app_id(mut self, app_id: String) -> Self {
        self.zalo_app_id = Some(app_id);
        self
    }

    pub fn set_zalo_app_secret(mut self, app_secret: String) -> Self {
        self.zalo_app_secret = Some(app_secret);
        self
    }

    pub fn set_zalo_callback_url(mut self, callback_url: String) -> Self {
        self.zalo_callback_url = Some(callback_url);
        self
    }

    /// Points every Zalo endpoint at `urls`. Used by tests to target a mock server.
    pub fn set_zalo_urls(mut self, urls: ProviderUrls) -> Self {
        self.zalo_auth_url = urls.auth_url;
        self.zalo_token_url = urls.token_url;
        self.zalo_profile_url = urls.profile_url;
        self
    }

    /// Returns the configured Zalo endpoints.
    pub fn zalo_urls(&self) -> ProviderUrls {
        ProviderUrls {
            auth_url: self.zalo_auth_url.clone(),
            token_url: self.zalo_token_url.clone(),
            profile_url: self.zalo_profile_url.clone(),
        }
    }

    pub fn uses_default_zalo_urls(&self) -> bool {
        self.zalo_urls() == zalo_urls()
    }

    /// Builds and validates the login strategy configuration.
    ///
    /// Missing Zalo credentials surface here, at startup, as configuration errors.
    pub fn strategy_config(&self) -> Result<StrategyConfig, Error> {
        let mut builder = StrategyConfig::builder()
            .fields(self.zalo_fields.iter().map(|f| f.trim()).filter(|f| !f.is_empty()))
            .verifier_length(self.pkce_verifier_length)
            .urls(self.zalo_urls())
            .http(HttpClientConfig {
                timeout: Duration::from_secs(self.http_timeout_secs),
                max_retries: self.http_max_retries,
                ..HttpClientConfig::default()
            });

        if let Some(app_id) = &self.zalo_app_id {
            builder = builder.app_id(app_id.as_str());
        }
        if let Some(app_secret) = &self.zalo_app_secret {
            builder = builder.app_secret(app_secret.as_str());
        }
        if let Some(callback_url) = &self.zalo_callback_url {
            builder = builder.callback_url(callback_url.as_str());
        }
        if let Some(state) = &self.zalo_state {
            builder = builder.state(state.as_str());
        }

        builder.build()
    }
}
