use crate::handlers;
use crate::state::WorkerState;
use axum::{
    routing::{get, post},
    Router,
};
use gallery_infra::request_id_middleware;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Push endpoint at the root, as registered on the subscription
pub fn setup_routes(state: Arc<WorkerState>) -> Router {
    Router::new()
        .route("/", post(handlers::push::handle_push))
        .route("/health", get(handlers::health::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}
