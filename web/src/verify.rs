//! Maps a Zalo profile to the user kept in this server's session.

use std::error::Error as StdError;

use async_trait::async_trait;
use log::*;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use zalo_auth::oauth::{Profile, Session, Verify};

/// Session key of the logged-in user.
pub const USER_SESSION_KEY: &str = "user";

/// The identity this server keeps for a logged-in Zalo user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Accepts any Zalo user with an id. Tokens are not kept.
pub struct ProfileVerifier;

#[async_trait]
impl Verify for ProfileVerifier {
    type User = SessionUser;

    async fn verify(
        &self,
        _access_token: &SecretString,
        _refresh_token: Option<&SecretString>,
        profile: Profile,
        session: &dyn Session,
    ) -> Result<SessionUser, Box<dyn StdError + Send + Sync>> {
        let user = session_user(&profile).ok_or("Zalo profile has no id")?;

        // The pair is spent; a later login binds a fresh one.
        session.clear_pkce().await?;

        debug!("Verified Zalo user {}", user.id);
        Ok(user)
    }
}

fn session_user(profile: &Profile) -> Option<SessionUser> {
    let id = profile.str_field("id").filter(|id| !id.is_empty())?;

    Some(SessionUser {
        id: id.to_string(),
        name: profile.str_field("name").map(str::to_string),
        // Zalo nests the picture URL: { "picture": { "data": { "url": ... } } }
        picture: profile
            .get("picture")
            .and_then(|p| p.pointer("/data/url"))
            .and_then(|url| url.as_str())
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use zalo_auth::oauth::{MemorySession, PkcePair};

    fn profile(value: serde_json::Value) -> Profile {
        serde_json::from_value(value).unwrap()
    }

    fn token() -> SecretString {
        SecretString::new("tok".to_string())
    }

    #[tokio::test]
    async fn test_verify_maps_profile_and_clears_pair() {
        let session = MemorySession::new();
        session.set_pkce(PkcePair::generate(43).unwrap()).await.unwrap();

        let user = ProfileVerifier
            .verify(
                &token(),
                None,
                profile(json!({
                    "id": "8000",
                    "name": "Lan",
                    "picture": { "data": { "url": "https://s120.zalo.me/a.jpg" } }
                })),
                &session,
            )
            .await
            .unwrap();

        assert_eq!(
            user,
            SessionUser {
                id: "8000".to_string(),
                name: Some("Lan".to_string()),
                picture: Some("https://s120.zalo.me/a.jpg".to_string()),
            }
        );
        assert!(session.pkce().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_verify_rejects_profile_without_id() {
        let session = MemorySession::new();

        let result = ProfileVerifier
            .verify(&token(), None, profile(json!({ "name": "Lan" })), &session)
            .await;

        assert!(result.is_err());
    }
}
