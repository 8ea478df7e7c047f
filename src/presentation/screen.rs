use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::acquisition::{AcquisitionError, Connectivity, CredentialSource};
use super::route::Route;
use crate::controller::AuthController;
use crate::models::AuthState;

pub const NETWORK_DIALOG_TITLE: &str = "No Internet Connection";
pub const NETWORK_DIALOG_TEXT: &str =
    "Please enable your internet connection to sign in with Google.";

/// One-shot side effects the screen asks its host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    Navigate(Route),
    /// Transient, auto-dismissing message.
    Notice(String),
    NetworkDialog { title: String, text: String },
}

impl UiEffect {
    fn network_dialog() -> Self {
        UiEffect::NetworkDialog {
            title: NETWORK_DIALOG_TITLE.to_string(),
            text: NETWORK_DIALOG_TEXT.to_string(),
        }
    }
}

/// What the login screen body shows for a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenView {
    Spinner,
    LoginForm,
}

impl ScreenView {
    pub fn for_state(state: &AuthState) -> Self {
        if state.is_loading() {
            ScreenView::Spinner
        } else {
            ScreenView::LoginForm
        }
    }
}

/// The login screen: acquires credentials, hands them to the controller and reacts to
/// the published state.
///
/// Each distinct state value produces at most one effect, so re-rendering while a
/// `Success` is active does not navigate twice.
pub struct AuthScreen {
    controller: Arc<AuthController>,
    connectivity: Arc<dyn Connectivity>,
    credentials: Arc<dyn CredentialSource>,
    states: watch::Receiver<AuthState>,
    last_observed: Option<AuthState>,
}

impl AuthScreen {
    pub fn new(
        controller: Arc<AuthController>,
        connectivity: Arc<dyn Connectivity>,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        let states = controller.subscribe();
        AuthScreen {
            controller,
            connectivity,
            credentials,
            states,
            last_observed: None,
        }
    }

    /// "Login with Google": check connectivity, run the picker, hand off the credential.
    ///
    /// Returns the effect to show when acquisition fails. Those failures are reported
    /// here only and leave `AuthState` untouched.
    pub async fn start_sign_in(&mut self) -> Option<UiEffect> {
        if !self.connectivity.is_online().await {
            info!("Sign-in requested while offline");
            return Some(UiEffect::network_dialog());
        }

        match self.credentials.acquire().await {
            Ok(credential) => {
                debug!("Credential acquired; handing off to controller");
                // The attempt's outcome is new even if it equals the previous one.
                self.last_observed = Some(AuthState::Loading);
                self.controller.sign_in(credential);
                None
            }
            Err(AcquisitionError::Offline) => Some(UiEffect::network_dialog()),
            Err(e) => {
                warn!("Credential acquisition failed: {}", e);
                Some(UiEffect::Notice(e.to_string()))
            }
        }
    }

    /// React to one observation of `state`.
    pub fn observe(&mut self, state: &AuthState) -> Option<UiEffect> {
        if self.last_observed.as_ref() == Some(state) {
            return None;
        }
        self.last_observed = Some(state.clone());

        match state {
            AuthState::Success { identity } => {
                let route = Route::Success {
                    user_name: identity.display_name_or_empty().to_string(),
                };
                info!("Navigating to '{}'", route.path());
                Some(UiEffect::Navigate(route))
            }
            AuthState::Error { message } => Some(UiEffect::Notice(message.clone())),
            AuthState::Idle | AuthState::Loading => None,
        }
    }

    /// Re-render against the latest published state.
    pub fn poll(&mut self) -> Option<UiEffect> {
        let state = self.states.borrow_and_update().clone();
        self.observe(&state)
    }

    /// Wait for the next state that calls for an effect. `None` once the controller is gone.
    pub async fn next_effect(&mut self) -> Option<UiEffect> {
        loop {
            if let Some(effect) = self.poll() {
                return Some(effect);
            }
            if self.states.changed().await.is_err() {
                return None;
            }
        }
    }

    pub fn view(&self) -> ScreenView {
        ScreenView::for_state(&self.states.borrow())
    }
}
