use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tuning for the sign-in controller.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone, Default, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Upper bound on a single verifier call. Unset means wait forever.
    #[serde(default)]
    pub verify_timeout_ms: Option<u64>,
}
