//! # zalo-auth
//!
//! Zalo login for web applications: an OAuth 2.0 authorization code flow
//! hardened with PKCE (RFC 7636).
//!
//! - PKCE verifier/challenge generation and per-session binding
//! - Authorization redirect construction
//! - Code-for-token exchange with the app secret sent in a header
//! - Profile retrieval from the Zalo Graph API
//! - A [`Strategy`](oauth::Strategy) sequencing the above and handing the result to
//!   an application-supplied verification callback
//!
//! ## Architecture
//!
//! The crate knows nothing about any web framework. Hosts supply a
//! [`Session`](oauth::Session) implementation for per-user storage and an
//! [`Actions`](oauth::Actions) implementation for the redirect/success/fail
//! responses; the `web` crate binds both to axum and tower-sessions.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zalo_auth::oauth::{AuthRequest, AuthenticateOptions, Strategy, StrategyConfig};
//!
//! let config = StrategyConfig::builder()
//!     .app_id("1234")
//!     .app_secret(secret)
//!     .callback_url("https://example.com/auth/zalo/callback")
//!     .build()?;
//! let strategy = Strategy::new(config, MyVerifier)?;
//! strategy
//!     .authenticate(&AuthRequest::from_query(query), &session, &AuthenticateOptions::default(), &mut actions)
//!     .await;
//! ```

pub mod error;
pub mod http;
pub mod oauth;
pub mod providers;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
