//! Application startup and server initialization.
//!
//! Builds the verifier and controller from configuration and serves the HTTP routes
//! until ctrl-c, then tears the controller down.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ConfigV1;
use crate::controller::AuthController;
use crate::routes;
use crate::state::AppState;
use crate::verifiers::create_verifier;

/// Wires the configured verifier into a fresh controller.
pub fn build_state(config: &ConfigV1) -> AppState {
    let verifier = create_verifier(&config.verifier);
    let controller = Arc::new(AuthController::new(
        verifier,
        config.controller.clone(),
    ));
    AppState { controller }
}

/// Initializes and runs the application server.
///
/// # Errors
///
/// Returns an error if the server fails to bind to the configured address
/// or encounters a runtime error while serving.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(&config);
    let controller = state.controller.clone();
    let app = routes::create_router(state);

    info!("Starting server on {}", config.bind_address);
    let listener = TcpListener::bind(&config.bind_address).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    controller.shutdown();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
