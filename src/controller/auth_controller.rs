use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ControllerConfig;
use crate::models::auth_state::{AUTHENTICATION_FAILED, UNKNOWN_ERROR, VERIFICATION_TIMED_OUT};
use crate::models::{AuthState, Credential, Identity};
use crate::verifiers::{Verifier, VerifyError};

/// Maps a verifier outcome onto the terminal state it publishes.
pub fn resolve_outcome(outcome: Result<Option<Identity>, VerifyError>) -> AuthState {
    match outcome {
        Ok(Some(identity)) => AuthState::success(identity),
        Ok(None) => AuthState::error(AUTHENTICATION_FAILED),
        Err(e) => AuthState::error(e.message().unwrap_or(UNKNOWN_ERROR)),
    }
}

/// Drives sign-in attempts and publishes their `AuthState`.
///
/// The state lives in a `watch` channel: any number of subscribers can read it and a
/// new subscriber always sees the last published value. Verification runs on spawned
/// tasks that share the controller's cancellation token, so dropping or shutting
/// down the controller abandons in-flight attempts without a final state.
pub struct AuthController {
    verifier: Arc<dyn Verifier>,
    config: ControllerConfig,
    state: Arc<watch::Sender<AuthState>>,
    /// Number of the most recent attempt. Only that attempt may publish an outcome.
    latest_attempt: Arc<AtomicU64>,
    scope: CancellationToken,
}

impl AuthController {
    pub fn new(verifier: Arc<dyn Verifier>, config: ControllerConfig) -> Self {
        info!(
            "Creating auth controller with verifier '{}' ({})",
            verifier.get_name(),
            verifier.get_type()
        );
        let (state, _) = watch::channel(AuthState::Idle);
        AuthController {
            verifier,
            config,
            state: Arc::new(state),
            latest_attempt: Arc::new(AtomicU64::new(0)),
            scope: CancellationToken::new(),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes. The receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn is_shut_down(&self) -> bool {
        self.scope.is_cancelled()
    }

    /// Starts a sign-in attempt.
    ///
    /// The state is `Loading` by the time this returns. The verifier is called once on a
    /// spawned task; the returned handle completes when that task publishes (or drops)
    /// its outcome. Must be called from within a tokio runtime.
    ///
    /// After `shutdown` the call is ignored: the state is left untouched, the verifier
    /// is not called and the returned handle finishes immediately.
    pub fn sign_in(&self, credential: Credential) -> JoinHandle<()> {
        if self.scope.is_cancelled() {
            warn!(
                provider_id = credential.provider_id(),
                "Sign-in requested after controller shutdown; ignoring"
            );
            return tokio::spawn(async {});
        }

        let mut attempt = 0;
        self.state.send_modify(|state| {
            attempt = self.latest_attempt.fetch_add(1, Ordering::SeqCst) + 1;
            *state = AuthState::Loading;
        });

        let attempt_id = Uuid::new_v4();
        info!(
            attempt,
            attempt_id = %attempt_id,
            provider_id = credential.provider_id(),
            "Sign-in attempt started"
        );

        let verifier = self.verifier.clone();
        let state = self.state.clone();
        let latest_attempt = self.latest_attempt.clone();
        let scope = self.scope.clone();
        let verify_timeout = self.config.verify_timeout_ms.map(Duration::from_millis);

        tokio::spawn(async move {
            let verification = async {
                match verify_timeout {
                    Some(limit) => match timeout(limit, verifier.verify(&credential)).await {
                        Ok(outcome) => resolve_outcome(outcome),
                        Err(_) => {
                            warn!(attempt, "Verifier '{}' timed out", verifier.get_name());
                            AuthState::error(VERIFICATION_TIMED_OUT)
                        }
                    },
                    None => resolve_outcome(verifier.verify(&credential).await),
                }
            };

            let next = tokio::select! {
                biased;
                _ = scope.cancelled() => {
                    debug!(attempt, "Controller shut down; dropping sign-in outcome");
                    return;
                }
                next = verification => next,
            };

            let published = state.send_if_modified(|current| {
                if latest_attempt.load(Ordering::SeqCst) != attempt {
                    return false;
                }
                *current = next.clone();
                true
            });

            if published {
                info!(
                    attempt,
                    attempt_id = %attempt_id,
                    outcome = next.name(),
                    "Sign-in attempt finished"
                );
            } else {
                debug!(
                    attempt,
                    attempt_id = %attempt_id,
                    outcome = next.name(),
                    "Superseded sign-in attempt finished; outcome dropped"
                );
            }
        })
    }

    /// Abandons all in-flight attempts. The current state is left as is.
    pub fn shutdown(&self) {
        if !self.scope.is_cancelled() {
            info!("Shutting down auth controller");
            self.scope.cancel();
        }
    }
}

impl Drop for AuthController {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    type Outcome = Result<Option<Identity>, VerifyError>;

    /// Verifier whose answers are held back until the test releases them.
    struct GatedVerifier {
        scripts: HashMap<String, (Arc<Notify>, Outcome)>,
        calls: AtomicUsize,
    }

    impl GatedVerifier {
        fn new(scripts: Vec<(&str, Outcome)>) -> (Arc<Self>, HashMap<String, Arc<Notify>>) {
            let mut gates = HashMap::new();
            let scripts = scripts
                .into_iter()
                .map(|(token, outcome)| {
                    let gate = Arc::new(Notify::new());
                    gates.insert(token.to_string(), gate.clone());
                    (token.to_string(), (gate, outcome))
                })
                .collect();
            (
                Arc::new(GatedVerifier {
                    scripts,
                    calls: AtomicUsize::new(0),
                }),
                gates,
            )
        }
    }

    #[async_trait::async_trait]
    impl Verifier for GatedVerifier {
        fn get_name(&self) -> &str {
            "gated"
        }

        fn get_type(&self) -> &str {
            "test"
        }

        async fn verify(&self, credential: &Credential) -> Outcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.scripts.get(credential.token()) {
                Some((gate, outcome)) => {
                    gate.notified().await;
                    outcome.clone()
                }
                None => futures::future::pending().await,
            }
        }
    }

    fn ann() -> Identity {
        Identity::new("u1", Some("Ann".to_string()))
    }

    #[test]
    fn test_resolve_outcome() {
        assert_eq!(resolve_outcome(Ok(Some(ann()))), AuthState::success(ann()));
        assert_eq!(
            resolve_outcome(Ok(None)),
            AuthState::error("Authentication failed.")
        );
        assert_eq!(
            resolve_outcome(Err(VerifyError::Transport("network unreachable".into()))),
            AuthState::error("network unreachable")
        );
        assert_eq!(
            resolve_outcome(Err(VerifyError::Unspecified)),
            AuthState::error("An unknown error occurred.")
        );
    }

    #[tokio::test]
    async fn test_initial_state_is_idle() {
        let (verifier, _) = GatedVerifier::new(vec![]);
        let controller = AuthController::new(verifier, ControllerConfig::default());

        assert_eq!(controller.state(), AuthState::Idle);
        assert_eq!(*controller.subscribe().borrow(), AuthState::Idle);
    }

    #[tokio::test]
    async fn test_sign_in_is_loading_before_outcome() {
        let (verifier, gates) = GatedVerifier::new(vec![("tok-123", Ok(Some(ann())))]);
        let controller = AuthController::new(verifier.clone(), ControllerConfig::default());

        let handle = controller.sign_in(Credential::google("tok-123"));
        assert_eq!(controller.state(), AuthState::Loading);

        gates["tok-123"].notify_one();
        handle.await.unwrap();

        assert_eq!(controller.state(), AuthState::success(ann()));
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sign_in_from_error_reenters_loading() {
        let (verifier, gates) = GatedVerifier::new(vec![
            ("tok-bad", Err(VerifyError::Rejected("nope".into()))),
            ("tok-123", Ok(Some(ann()))),
        ]);
        let controller = AuthController::new(verifier, ControllerConfig::default());

        gates["tok-bad"].notify_one();
        controller.sign_in(Credential::google("tok-bad")).await.unwrap();
        assert_eq!(controller.state(), AuthState::error("nope"));

        let handle = controller.sign_in(Credential::google("tok-123"));
        assert_eq!(controller.state(), AuthState::Loading);
        gates["tok-123"].notify_one();
        handle.await.unwrap();
        assert_eq!(controller.state(), AuthState::success(ann()));
    }

    #[tokio::test]
    async fn test_superseded_attempt_cannot_overwrite_newer_result() {
        let (verifier, gates) = GatedVerifier::new(vec![
            ("slow", Err(VerifyError::Rejected("stale".into()))),
            ("fast", Ok(Some(ann()))),
        ]);
        let controller = AuthController::new(verifier, ControllerConfig::default());

        let first = controller.sign_in(Credential::google("slow"));
        let second = controller.sign_in(Credential::google("fast"));
        assert_eq!(controller.state(), AuthState::Loading);

        gates["fast"].notify_one();
        second.await.unwrap();
        assert_eq!(controller.state(), AuthState::success(ann()));

        gates["slow"].notify_one();
        first.await.unwrap();
        assert_eq!(controller.state(), AuthState::success(ann()));
    }

    #[tokio::test]
    async fn test_shutdown_drops_in_flight_outcome() {
        let (verifier, gates) = GatedVerifier::new(vec![("tok-123", Ok(Some(ann())))]);
        let controller = AuthController::new(verifier, ControllerConfig::default());

        let handle = controller.sign_in(Credential::google("tok-123"));
        controller.shutdown();
        gates["tok-123"].notify_one();
        handle.await.unwrap();

        assert!(controller.is_shut_down());
        assert_eq!(controller.state(), AuthState::Loading);
    }

    #[tokio::test]
    async fn test_sign_in_after_shutdown_leaves_state_untouched() {
        let (verifier, gates) = GatedVerifier::new(vec![
            ("tok-bad", Err(VerifyError::Rejected("nope".into()))),
            ("tok-123", Ok(Some(ann()))),
        ]);
        let controller = AuthController::new(verifier.clone(), ControllerConfig::default());

        gates["tok-bad"].notify_one();
        controller.sign_in(Credential::google("tok-bad")).await.unwrap();
        let mut rx = controller.subscribe();
        controller.shutdown();

        controller.sign_in(Credential::google("tok-123")).await.unwrap();

        assert_eq!(controller.state(), AuthState::error("nope"));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drop_cancels_in_flight_attempt() {
        let (verifier, _) = GatedVerifier::new(vec![]);
        let controller = AuthController::new(verifier, ControllerConfig::default());
        let mut rx = controller.subscribe();

        let handle = controller.sign_in(Credential::google("hangs"));
        drop(controller);
        handle.await.unwrap();

        assert_eq!(*rx.borrow_and_update(), AuthState::Loading);
        assert!(rx.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_publishes_timeout_error() {
        let (verifier, _) = GatedVerifier::new(vec![]);
        let controller = AuthController::new(
            verifier,
            ControllerConfig {
                verify_timeout_ms: Some(50),
            },
        );

        controller
            .sign_in(Credential::google("hangs"))
            .await
            .unwrap();

        assert_eq!(controller.state(), AuthState::error("Verification timed out."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_without_timeout_state_stays_loading() {
        let (verifier, _) = GatedVerifier::new(vec![]);
        let controller = AuthController::new(verifier, ControllerConfig::default());

        let _handle = controller.sign_in(Credential::google("hangs"));
        tokio::time::sleep(Duration::from_secs(3600)).await;

        assert_eq!(controller.state(), AuthState::Loading);
    }
}
