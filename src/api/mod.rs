//! HTTP API module
//!
//! Demo host surface: attaches countdown widgets and forwards attribute
//! snapshots and sync messages to them, plus the stateless stack and
//! duration helpers.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/widgets", post(attach_handler).get(list_handler))
        .route("/widgets/:id", get(view_handler).delete(detach_handler))
        .route("/widgets/:id/attributes", put(attributes_handler))
        .route("/widgets/:id/sync", post(sync_handler))
        .route("/widgets/:id/initialize", post(initialize_handler))
        .route("/stack/layout", get(stack_layout_handler))
        .route("/duration", get(duration_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
