//! Shared application state.

use crate::controller::AuthController;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The single sign-in controller this process owns.
    pub controller: Arc<AuthController>,
}
