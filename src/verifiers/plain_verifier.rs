use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Credential, Identity};
use crate::verifiers::{Verifier, VerifyError};

/// PlainVerifierConfig lists the tokens a local/dev verifier accepts.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct PlainVerifierConfig {
    /// A friendly name for logs.
    pub name: String,
    pub accounts: Vec<PlainAccountEntry>,
}

/// One accepted token and what verifying it yields.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct PlainAccountEntry {
    pub token: String,
    /// Missing id means the backend answers without a user.
    pub id: Option<String>,
    pub name: Option<String>,
    /// When set, verifying this token fails with this message.
    pub error: Option<String>,
}

/// A `PlainVerifier` that resolves tokens against the list in `PlainVerifierConfig`.
pub struct PlainVerifier {
    pub config: PlainVerifierConfig,
}

impl PlainVerifier {
    pub fn new(config: &PlainVerifierConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Verifier for PlainVerifier {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    fn get_type(&self) -> &str {
        "plain"
    }

    async fn verify(&self, credential: &Credential) -> Result<Option<Identity>, VerifyError> {
        debug!(
            "Plain verification attempt for provider '{}'",
            credential.provider_id()
        );

        let entry = self
            .config
            .accounts
            .iter()
            .find(|entry| entry.token == credential.token())
            .ok_or_else(|| VerifyError::Rejected("Invalid credential".to_string()))?;

        if let Some(message) = &entry.error {
            return Err(VerifyError::Rejected(message.clone()));
        }

        Ok(entry
            .id
            .as_ref()
            .map(|id| Identity::new(id.clone(), entry.name.clone())))
    }
}
