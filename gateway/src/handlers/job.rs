use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::job::JobPayload;
use crate::state::AppState;

/// Run one job to completion and return its result record.
///
/// Status is `200` on success, `400` for input errors and `500` for every
/// other failure. A body that is not a job payload is rejected with `400`.
pub async fn run_job(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<JobPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected job payload");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": rejection.body_text() })),
            )
                .into_response();
        }
    };

    info!(
        chars = payload.input.text.chars().count(),
        voice = payload.input.voice.as_deref().unwrap_or(state.orchestrator.default_voice()),
        "Job received"
    );

    let result = state.orchestrator.run(payload.input).await;
    (result.status_code(), Json(result)).into_response()
}
