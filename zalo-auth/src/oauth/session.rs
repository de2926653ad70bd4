//! Binding of the PKCE pair to the user's session.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::pkce::PkcePair;
use crate::error::Error;

/// Session key under which the PKCE pair is stored.
pub const PKCE_SESSION_KEY: &str = "pkce";

/// Per-user session storage provided by the host framework.
///
/// Implementations adapt whatever session mechanism the host uses (cookie
/// sessions, server-side stores, ...). The flow only ever touches the PKCE pair.
#[async_trait]
pub trait Session: Send + Sync {
    /// Read the PKCE pair bound to this session, if any.
    async fn pkce(&self) -> Result<Option<PkcePair>, Error>;

    /// Bind a PKCE pair to this session, replacing any previous one.
    async fn set_pkce(&self, pair: PkcePair) -> Result<(), Error>;

    /// Remove the PKCE pair from this session.
    async fn clear_pkce(&self) -> Result<(), Error>;
}

/// Session held in process memory.
///
/// Useful for tests and for hosts that keep their own per-request state.
#[derive(Debug, Default)]
pub struct MemorySession {
    pkce: Mutex<Option<PkcePair>>,
}

impl MemorySession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Session for MemorySession {
    async fn pkce(&self) -> Result<Option<PkcePair>, Error> {
        Ok(self.pkce.lock().await.clone())
    }

    async fn set_pkce(&self, pair: PkcePair) -> Result<(), Error> {
        *self.pkce.lock().await = Some(pair);
        Ok(())
    }

    async fn clear_pkce(&self) -> Result<(), Error> {
        self.pkce.lock().await.take();
        Ok(())
    }
}

/// Attaches one PKCE pair to a session and hands the same pair back on every
/// later call until the session is reset.
#[derive(Debug, Clone, Copy)]
pub struct SessionBinder {
    verifier_length: usize,
}

impl SessionBinder {
    /// Create a binder generating verifiers of `verifier_length` characters.
    pub fn new(verifier_length: usize) -> Self {
        Self { verifier_length }
    }

    /// Return the pair bound to `session`, generating and storing one if absent.
    pub async fn get_or_create(&self, session: &dyn Session) -> Result<PkcePair, Error> {
        if let Some(pair) = session.pkce().await? {
            debug!("Reusing PKCE pair bound to session");
            return Ok(pair);
        }

        let pair = PkcePair::generate(self.verifier_length)?;
        session.set_pkce(pair.clone()).await?;
        debug!("Bound new PKCE pair to session");

        Ok(pair)
    }
}
