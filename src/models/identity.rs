use serde::{Deserialize, Serialize};

/// The Identity struct represents a user the verifier vouched for.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Opaque id assigned by the identity backend.
    pub id: String,
    #[serde(rename = "name", default)]
    pub display_name: Option<String>,
}

impl Identity {
    /// Construct a new Identity with an optional display name.
    pub fn new(id: impl Into<String>, display_name: Option<String>) -> Self {
        Identity {
            id: id.into(),
            display_name,
        }
    }

    /// Display name used in the success route; empty when the backend sent none.
    pub fn display_name_or_empty(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }
}
