//! OAuth 2.0 authorization code flow with PKCE against Zalo.
//!
//! Components, leaves first: [`pkce`] generates verifier/challenge pairs, the
//! [`SessionBinder`] keeps one pair per session, [`authorization_url`] builds
//! the consent redirect, [`TokenExchanger`] trades the code for tokens,
//! [`ProfileFetcher`] loads the profile and [`Strategy`] sequences them.

mod authorize;
mod config;
mod pkce;
mod profile;
mod response;
mod session;
mod strategy;

pub mod token;

pub use authorize::authorization_url;
pub use config::{StrategyConfig, StrategyConfigBuilder};
pub use pkce::{
    PkceChallenge, PkcePair, PkceVerifier, DEFAULT_VERIFIER_LENGTH, VERIFIER_LENGTH_RANGE,
};
pub use profile::{profile_request_url, Profile, ProfileFetcher, ProfileResult, ACCESS_TOKEN_HEADER};
pub use session::{MemorySession, Session, SessionBinder, PKCE_SESSION_KEY};
pub use strategy::{Actions, AuthRequest, AuthenticateOptions, Outcome, Strategy, Verify};
pub use token::{TokenExchanger, TokenGrant, TokenResult};
