use axum::{Router, middleware, routing::get};
use std::sync::Arc;

use crate::handlers::{health_handler, metrics_handler, ping_handler};
use crate::middleware::admission;
use crate::state::AppState;

// Only routes added before `route_layer` pass through the admission middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ping", get(ping_handler))
        .route_layer(middleware::from_fn_with_state(Arc::clone(&state), admission))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}
