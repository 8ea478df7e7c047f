use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    firebase_verifier::{FirebaseVerifier, FirebaseVerifierConfig},
    plain_verifier::{PlainVerifier, PlainVerifierConfig},
};
use crate::models::{Credential, Identity};

/// Configuration options for the identity verification backend.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
#[serde(tag = "type")]
pub enum VerifierConfig {
    #[serde(rename = "firebase")]
    Firebase(FirebaseVerifierConfig),
    #[serde(rename = "plain")]
    Plain(PlainVerifierConfig),
}

/// A failure reported by a verifier. The message, when present, is shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The backend looked at the credential and refused it.
    #[error("{0}")]
    Rejected(String),
    /// The backend could not be reached or answered with garbage.
    #[error("{0}")]
    Transport(String),
    /// The backend failed without a message.
    #[error("verification failed without a message")]
    Unspecified,
}

impl VerifyError {
    pub fn message(&self) -> Option<&str> {
        match self {
            VerifyError::Rejected(m) | VerifyError::Transport(m) => Some(m),
            VerifyError::Unspecified => None,
        }
    }
}

/// A verifier exchanges an opaque credential for an identity.
///
/// `Ok(None)` means the backend accepted the call but returned no user.
#[async_trait::async_trait]
pub trait Verifier: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_type(&self) -> &str;
    async fn verify(&self, credential: &Credential) -> Result<Option<Identity>, VerifyError>;
}

/// Create a verifier from a given config.
pub fn create_verifier(config: &VerifierConfig) -> Arc<dyn Verifier> {
    match config {
        VerifierConfig::Firebase(cfg) => Arc::new(FirebaseVerifier::new(cfg)),
        VerifierConfig::Plain(cfg) => Arc::new(PlainVerifier::new(cfg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            VerifyError::Rejected("bad token".to_string()).message(),
            Some("bad token")
        );
        assert_eq!(
            VerifyError::Transport("network unreachable".to_string()).to_string(),
            "network unreachable"
        );
        assert_eq!(VerifyError::Unspecified.message(), None);
    }

    #[test]
    fn test_create_verifier_from_yaml_tag() {
        let config: VerifierConfig = serde_json::from_value(serde_json::json!({
            "type": "plain",
            "name": "dev",
            "accounts": []
        }))
        .unwrap();
        let verifier = create_verifier(&config);
        assert_eq!(verifier.get_name(), "dev");
        assert_eq!(verifier.get_type(), "plain");
    }
}
