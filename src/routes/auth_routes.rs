//! Sign-in endpoint handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::credential::GOOGLE_PROVIDER_ID;
use crate::models::{AuthState, Credential};
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

fn default_provider_id() -> String {
    GOOGLE_PROVIDER_ID.to_string()
}

/// Body of `POST /sign-in`: the credential produced by the client's account picker.
#[derive(Deserialize)]
pub struct SignInRequest {
    #[serde(default = "default_provider_id")]
    pub provider_id: String,
    pub token: String,
}

/// Registers sign-in routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sign-in", post(sign_in))
        .route("/state", get(current_state))
}

/// Hands the credential to the controller and answers with the state at hand-off
/// (`loading`). Clients poll `GET /state` for the outcome.
async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<impl IntoResponse, HTTPError> {
    if request.token.trim().is_empty() {
        warn!("Rejected sign-in request with an empty credential");
        return Err(HTTPError::new(
            StatusCode::BAD_REQUEST,
            "Credential token must not be empty",
        ));
    }
    if state.controller.is_shut_down() {
        return Err(HTTPError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Sign-in is shutting down",
        ));
    }

    debug!("Received sign-in request for provider '{}'", request.provider_id);
    state
        .controller
        .sign_in(Credential::new(request.provider_id, request.token));

    Ok((StatusCode::ACCEPTED, Json(AuthState::Loading)))
}

/// Returns the last published state.
async fn current_state(State(state): State<AppState>) -> Json<AuthState> {
    Json(state.controller.state())
}
