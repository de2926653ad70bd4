//! HTTP surface for logging in with Zalo.
//!
//! `GET /auth/zalo` starts the flow, Zalo sends the browser back to
//! `GET /auth/zalo/callback`, and the logged-in user is then kept in the
//! tower-sessions session under [`verify::USER_SESSION_KEY`].

use std::sync::Arc;

use log::*;
use service::config::Config;
use tokio::net::TcpListener;
use zalo_auth::oauth::Strategy;

mod actions;
mod controller;
mod middleware;
mod session;

pub mod error;
pub mod router;
pub mod verify;

pub use session::TowerSession;
pub use verify::{ProfileVerifier, SessionUser};

// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub strategy: Arc<Strategy<ProfileVerifier>>,
}

impl AppState {
    /// Validates the Zalo settings in `config` and builds the login strategy.
    pub fn new(config: Config) -> Result<Self, zalo_auth::Error> {
        let strategy = Strategy::new(config.strategy_config()?, ProfileVerifier)?;

        Ok(Self {
            config,
            strategy: Arc::new(strategy),
        })
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let address = format!("{}:{}", interface, app_state.config.port);

    if !app_state.config.uses_default_zalo_urls() {
        warn!("Using non-default Zalo endpoints: {:?}", app_state.config.zalo_urls());
    }

    let listener = TcpListener::bind(&address).await?;
    info!("Server starting... listening for connections on http://{address}");

    axum::serve(listener, router::define_routes(app_state)).await
}
