use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers::job;
use crate::state::AppState;
use std::sync::Arc;

/// Create the job API router
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/runsync", post(job::run_job))
        .layer(TraceLayer::new_for_http())
}
