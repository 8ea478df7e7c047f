use serde::{Deserialize, Serialize};

use super::identity::Identity;

/// Published when the verifier succeeds but hands back no identity.
pub const AUTHENTICATION_FAILED: &str = "Authentication failed.";
/// Published when the verifier fails without saying why.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred.";
/// Published when `verify_timeout_ms` elapses before the verifier answers.
pub const VERIFICATION_TIMED_OUT: &str = "Verification timed out.";

/// Lifecycle of a single sign-in attempt. Exactly one variant is active at a time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum AuthState {
    /// No attempt in progress.
    #[default]
    Idle,
    /// Credential verification in flight.
    Loading,
    Success { identity: Identity },
    Error { message: String },
}

impl AuthState {
    pub fn success(identity: Identity) -> Self {
        AuthState::Success { identity }
    }

    pub fn error(message: impl Into<String>) -> Self {
        AuthState::Error {
            message: message.into(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    /// Success and Error end an attempt, though a new sign-in may leave either.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AuthState::Success { .. } | AuthState::Error { .. })
    }

    /// Short variant name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            AuthState::Idle => "idle",
            AuthState::Loading => "loading",
            AuthState::Success { .. } => "success",
            AuthState::Error { .. } => "error",
        }
    }
}
