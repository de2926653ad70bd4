//! PKCE (Proof Key for Code Exchange) support for OAuth 2.0.
//!
//! Implements the S256 method of RFC 7636: the challenge is the unpadded
//! base64url encoding of the SHA-256 digest of the verifier.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{config_error, ConfigErrorKind, Error};

/// Verifier length used when none is configured (the RFC 7636 minimum).
pub const DEFAULT_VERIFIER_LENGTH: usize = 43;

/// Verifier lengths accepted by providers that follow RFC 7636.
pub const VERIFIER_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 43..=128;

/// PKCE code verifier (random alphanumeric string).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PkceVerifier(String);

impl PkceVerifier {
    /// Generate a new random verifier of `length` characters drawn from `[A-Za-z0-9]`.
    pub fn generate(length: usize) -> Result<Self, Error> {
        if length == 0 {
            return Err(config_error(
                ConfigErrorKind::InvalidVerifierLength,
                "PKCE verifier length must be positive",
            ));
        }

        let verifier = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect();
        Ok(Self(verifier))
    }

    /// Create a PKCE verifier from an existing string.
    pub fn from_string(verifier: String) -> Self {
        Self(verifier)
    }

    /// Get the verifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generate the corresponding code challenge.
    pub fn challenge(&self) -> PkceChallenge {
        PkceChallenge::from_verifier(self)
    }
}

/// PKCE code challenge (SHA256 hash of verifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PkceChallenge(String);

impl PkceChallenge {
    /// Create a code challenge from a verifier.
    pub fn from_verifier(verifier: &PkceVerifier) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(verifier.as_str().as_bytes());
        let hash = hasher.finalize();
        let challenge = URL_SAFE_NO_PAD.encode(hash);
        Self(challenge)
    }

    /// Get the challenge string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check that this challenge was derived from `verifier`, as the provider does.
    pub fn matches(&self, verifier: &PkceVerifier) -> bool {
        *self == Self::from_verifier(verifier)
    }
}

/// A verifier together with its derived challenge.
///
/// One pair lives in the user's session for the whole redirect round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PkcePair {
    #[serde(rename = "code_verifier")]
    pub verifier: PkceVerifier,
    #[serde(rename = "code_challenge")]
    pub challenge: PkceChallenge,
}

impl PkcePair {
    /// Generate a fresh pair with a verifier of `length` characters.
    pub fn generate(length: usize) -> Result<Self, Error> {
        let verifier = PkceVerifier::generate(length)?;
        let challenge = verifier.challenge();
        Ok(Self {
            verifier,
            challenge,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_pkce_verifier_length_and_alphabet() {
        for length in [1, 43, 64, 128] {
            let verifier = PkceVerifier::generate(length).unwrap();
            assert_eq!(verifier.as_str().len(), length);
            assert!(verifier.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_pkce_verifier_zero_length_rejected() {
        let err = PkceVerifier::generate(0).unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::Config(ConfigErrorKind::InvalidVerifierLength)
        );
    }

    #[test]
    fn test_pkce_challenge_rfc7636_vector() {
        // Appendix B of RFC 7636.
        let verifier =
            PkceVerifier::from_string("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk".to_string());
        assert_eq!(
            verifier.challenge().as_str(),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn test_pkce_challenge_is_unpadded_base64url() {
        let pair = PkcePair::generate(DEFAULT_VERIFIER_LENGTH).unwrap();
        let challenge = pair.challenge.as_str();
        assert_eq!(challenge.len(), 43);
        assert!(!challenge.contains('='));
        assert!(!challenge.contains('+'));
        assert!(!challenge.contains('/'));
    }

    #[test]
    fn test_pkce_challenge_deterministic() {
        let verifier = PkceVerifier::from_string("test_verifier".to_string());
        let challenge1 = verifier.challenge();
        let challenge2 = verifier.challenge();
        assert_eq!(challenge1.as_str(), challenge2.as_str());
        assert!(challenge1.matches(&verifier));
    }

    #[test]
    fn test_pkce_pair_serializes_with_oauth_names() {
        let pair = PkcePair::generate(43).unwrap();
        let value = serde_json::to_value(&pair).unwrap();
        assert_eq!(value["code_verifier"], pair.verifier.as_str());
        assert_eq!(value["code_challenge"], pair.challenge.as_str());

        let restored: PkcePair = serde_json::from_value(value).unwrap();
        assert_eq!(restored, pair);
    }
}
