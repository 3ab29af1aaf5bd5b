//! MapML API service library.
//!
//! Exposes the router and its parts so the binary and the integration
//! tests build the same application.

pub mod config;
pub mod handlers;
pub mod state;

use axum::{extract::Extension, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router over `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // MapML KVP endpoints
        .route("/wms", get(handlers::mapml_handler))
        .route("/mapml", get(handlers::mapml_handler))
        // Health check
        .route("/health", get(handlers::health_handler))
        // Metrics
        .route("/metrics", get(handlers::metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
