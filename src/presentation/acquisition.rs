use async_trait::async_trait;
use thiserror::Error;

use crate::models::Credential;

/// Failures that happen before a credential exists. These never reach `AuthState`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    #[error("No Internet Connection")]
    Offline,
    #[error("Sign-in cancelled")]
    Cancelled,
    /// The provider's interactive flow failed, e.g. a malformed picker response.
    #[error("{0}")]
    Provider(String),
}

/// Reports whether a network path is available before starting the picker.
#[async_trait]
pub trait Connectivity: Send + Sync {
    async fn is_online(&self) -> bool;
}

/// Runs a provider-specific interactive flow (an account picker) and yields its credential.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn acquire(&self) -> Result<Credential, AcquisitionError>;
}
