//! Server Startup Tests
//!
//! Boots the router the way `main` does and drives it with `oneshot`.

mod fixtures;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use fixtures::{FakeEngine, state_with, state_without_storage, test_config};
use kokoro_gateway::{AppState, routes};

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/",
            axum::routing::get(kokoro_gateway::handlers::api::health_check),
        )
        .merge(routes::api::create_api_router())
        .with_state(state)
}

fn job_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/runsync")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// The real state builds without contacting the engine or storage
#[tokio::test]
async fn test_minimal_config_boot() {
    let app_state = AppState::new(test_config()).await;
    assert!(!app_state.voices.is_initialized());

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app(app_state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "OK"}));
}

#[tokio::test]
async fn test_runsync_success() {
    let engine = Arc::new(FakeEngine::new(&["af_heart"]));
    let (state, _) = state_with(test_config(), engine);

    let payload = json!({
        "input": {
            "text": "Hello [1s] world",
            "user_id": 9,
            "project_id": "p1",
            "chapter_id": "c2"
        }
    });
    let response = app(state)
        .oneshot(job_request(payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["audio_url"],
        "https://audio.example.com/kokoro_audio/9/project_p1_chapter_c2.wav"
    );
    assert_eq!(body["voice"], "af_heart");
    assert_eq!(body["format"], "wav");
    assert_eq!(body["sample_rate"], 24000);
    assert_eq!(body["text_length"], 16);
}

#[tokio::test]
async fn test_runsync_missing_text_is_bad_request() {
    let engine = Arc::new(FakeEngine::new(&["af_heart"]));
    let (state, _) = state_with(test_config(), engine);

    let response = app(state)
        .oneshot(job_request(json!({"input": {}}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "No text provided"}));
}

#[tokio::test]
async fn test_runsync_null_text_is_bad_request() {
    let engine = Arc::new(FakeEngine::new(&["af_heart"]));
    let (state, _) = state_with(test_config(), engine.clone());

    for body in [r#"{"input": {"text": null}}"#, r#"{"input": null}"#] {
        let response = app(state.clone())
            .oneshot(job_request(body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "No text provided"}));
    }
    assert_eq!(engine.load_count(), 0);
}

#[tokio::test]
async fn test_runsync_without_storage_is_server_error() {
    let engine = Arc::new(FakeEngine::new(&["af_heart"]));
    let state = state_without_storage(test_config(), engine);

    let response = app(state)
        .oneshot(job_request(json!({"input": {"text": "Hi"}}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("not configured"));
    assert!(body.get("traceback").is_none());
}

#[tokio::test]
async fn test_runsync_traceback_when_enabled() {
    let engine = Arc::new(FakeEngine::new(&["af_heart"]).silent_on("hush"));
    let mut config = test_config();
    config.include_traceback = true;
    let (state, _) = state_with(config, engine);

    let response = app(state)
        .oneshot(job_request(json!({"input": {"text": "hush"}}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No audio generated");
    assert!(
        body["traceback"]
            .as_str()
            .unwrap()
            .starts_with("SynthesisError during synthesizing")
    );
}

#[tokio::test]
async fn test_runsync_malformed_json_is_bad_request() {
    let engine = Arc::new(FakeEngine::new(&["af_heart"]));
    let (state, _) = state_with(test_config(), engine);

    let response = app(state)
        .oneshot(job_request("{not json".to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_runsync_requires_post() {
    let engine = Arc::new(FakeEngine::new(&["af_heart"]));
    let (state, _) = state_with(test_config(), engine);

    let request = Request::builder()
        .uri("/runsync")
        .body(Body::empty())
        .unwrap();
    let response = app(state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
