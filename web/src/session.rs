//! tower-sessions backed storage for the login flow.

use async_trait::async_trait;
use tower_sessions::Session;

use zalo_auth::error::{session_error, Error};
use zalo_auth::oauth::{PkcePair, Session as FlowSession, PKCE_SESSION_KEY};

/// Adapts a [`tower_sessions::Session`] to the login flow's session trait.
#[derive(Clone, Debug)]
pub struct TowerSession(Session);

impl TowerSession {
    pub fn new(session: Session) -> Self {
        Self(session)
    }
}

#[async_trait]
impl FlowSession for TowerSession {
    async fn pkce(&self) -> Result<Option<PkcePair>, Error> {
        self.0
            .get::<PkcePair>(PKCE_SESSION_KEY)
            .await
            .map_err(|e| session_error(Box::new(e)))
    }

    async fn set_pkce(&self, pair: PkcePair) -> Result<(), Error> {
        self.0
            .insert(PKCE_SESSION_KEY, pair)
            .await
            .map_err(|e| session_error(Box::new(e)))
    }

    async fn clear_pkce(&self) -> Result<(), Error> {
        self.0
            .remove::<PkcePair>(PKCE_SESSION_KEY)
            .await
            .map(|_| ())
            .map_err(|e| session_error(Box::new(e)))
    }
}
