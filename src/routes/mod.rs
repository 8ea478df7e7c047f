//! HTTP route definitions and handlers.
//!
//! A local UI shell drives sign-in through these endpoints and polls the state.

mod auth_routes;
mod health_routes;

use crate::state::AppState;
use axum::Router;

/// Creates the application router with all configured routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(auth_routes::routes())
        .merge(health_routes::routes())
        .with_state(state)
}
