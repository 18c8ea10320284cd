use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{api_key_auth, logging_middleware};
use super::state::AppState;
use super::v1;

/// Create the full router with application state.
///
/// The authentication gate wraps the whole surface; exemptions (health
/// probes, registration) are decided inside the gate itself so no route can
/// accidentally ship unguarded.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/v1", v1::create_v1_router())
        .layer(middleware::from_fn_with_state(state.clone(), api_key_auth))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
