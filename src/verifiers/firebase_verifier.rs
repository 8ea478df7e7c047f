use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::models::{Credential, Identity};
use crate::verifiers::{Verifier, VerifyError};

fn default_endpoint() -> String {
    "https://identitytoolkit.googleapis.com".to_string()
}

fn default_request_uri() -> String {
    "http://localhost".to_string()
}

/// Config for a verifier backed by the Firebase Identity Toolkit REST API.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct FirebaseVerifierConfig {
    pub name: String,
    /// Web API key of the Firebase project.
    pub api_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Sent as `requestUri`; Firebase only requires it to be a valid URI.
    #[serde(default = "default_request_uri")]
    pub request_uri: String,
}

/// Exchanges an identity-provider token (e.g. a Google ID token) for a Firebase user
/// via `accounts:signInWithIdp`.
pub struct FirebaseVerifier {
    config: FirebaseVerifierConfig,
    client: reqwest::Client,
}

impl FirebaseVerifier {
    pub fn new(config: &FirebaseVerifierConfig) -> Self {
        info!(
            "Creating FirebaseVerifier name='{}' endpoint='{}'",
            config.name, config.endpoint
        );
        Self {
            config: config.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn sign_in_url(&self) -> String {
        format!(
            "{}/v1/accounts:signInWithIdp?key={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.api_key
        )
    }
}

/// Reads the user out of a successful `signInWithIdp` body.
fn identity_from_response(body: &Value) -> Option<Identity> {
    let id = body
        .get("localId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())?;
    let display_name = body
        .get("displayName")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(Identity::new(id, display_name))
}

/// Form-encodes the `postBody` pairs so token bytes such as `&` or `=` stay inside
/// the `id_token` value.
fn encode_post_body(credential: &Credential) -> Result<String, VerifyError> {
    let url = reqwest::Url::parse_with_params(
        "http://localhost",
        &[
            ("id_token", credential.token()),
            ("providerId", credential.provider_id()),
        ],
    )
    .map_err(|e| VerifyError::Transport(format!("Failed to encode signInWithIdp body: {}", e)))?;
    Ok(url.query().unwrap_or_default().to_string())
}

/// Firebase reports failures as `{"error": {"code": .., "message": ".."}}`.
fn error_from_response(body: Option<&Value>) -> VerifyError {
    match body
        .and_then(|b| b.get("error"))
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        Some(message) => VerifyError::Rejected(message.to_string()),
        None => VerifyError::Unspecified,
    }
}

#[async_trait]
impl Verifier for FirebaseVerifier {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    fn get_type(&self) -> &str {
        "firebase"
    }

    async fn verify(&self, credential: &Credential) -> Result<Option<Identity>, VerifyError> {
        debug!(
            "Exchanging '{}' credential with Firebase",
            credential.provider_id()
        );

        let request_body = json!({
            "postBody": encode_post_body(credential)?,
            "requestUri": self.config.request_uri,
            "returnIdpCredential": true,
            "returnSecureToken": true,
        });

        let resp = self
            .client
            .post(self.sign_in_url())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| VerifyError::Transport(format!("Failed to call signInWithIdp: {}", e)))?;

        let status = resp.status();
        let body = resp.json::<Value>().await;

        if !status.is_success() {
            warn!("Firebase rejected credential with status {}", status);
            return Err(error_from_response(body.as_ref().ok()));
        }

        let body = body.map_err(|e| {
            VerifyError::Transport(format!("Failed to parse signInWithIdp JSON: {}", e))
        })?;

        Ok(identity_from_response(&body))
    }
}
