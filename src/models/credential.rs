use std::fmt;

use serde::Deserialize;

/// Provider id Google ID tokens are exchanged under.
pub const GOOGLE_PROVIDER_ID: &str = "google.com";

/// An opaque, externally issued credential handed to a verifier.
///
/// The controller never looks inside the token; only the verifier does.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credential {
    provider_id: String,
    token: String,
}

impl Credential {
    pub fn new(provider_id: impl Into<String>, token: impl Into<String>) -> Self {
        Credential {
            provider_id: provider_id.into(),
            token: token.into(),
        }
    }

    /// Wraps a Google ID token obtained from the account picker.
    pub fn google(id_token: impl Into<String>) -> Self {
        Self::new(GOOGLE_PROVIDER_ID, id_token)
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_empty(&self) -> bool {
        self.token.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("provider_id", &self.provider_id)
            .field("token", &"<redacted>")
            .finish()
    }
}
