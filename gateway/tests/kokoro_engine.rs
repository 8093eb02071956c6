//! Kokoro HTTP engine tests against a mock inference server.

use std::sync::Arc;

use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kokoro_gateway::core::tts::{
    KokoroTTS, KokoroTTSConfig, SegmentSynthesizer, TTSError, TtsEngine, VoiceCache, VoicePack,
};

fn pcm(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

fn engine_for(server: &MockServer, api_key: Option<&str>) -> KokoroTTS {
    KokoroTTS::new(KokoroTTSConfig {
        base_url: server.uri(),
        api_key: api_key.map(str::to_string),
        ..Default::default()
    })
    .unwrap()
}

async fn mount_voices(server: &MockServer, voices: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/v1/audio/voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "voices": voices })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_load_known_voice() {
    let server = MockServer::start().await;
    mount_voices(&server, &["af_heart", "am_michael"]).await;
    let engine = engine_for(&server, None);

    let pack = engine.load_voice("am_michael").await.unwrap();

    assert_eq!(pack.id(), "am_michael");
}

#[tokio::test]
async fn test_load_unknown_voice() {
    let server = MockServer::start().await;
    mount_voices(&server, &["af_heart"]).await;
    let engine = engine_for(&server, None);

    let err = engine.load_voice("zz_unknown").await.unwrap_err();

    assert_eq!(err, TTSError::VoiceNotFound("zz_unknown".to_string()));
}

#[tokio::test]
async fn test_synthesize_decodes_pcm_stream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_partial_json(json!({
            "model": "kokoro",
            "input": "Hello",
            "voice": "af_heart",
            "response_format": "pcm",
            "stream": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(pcm(&[16384, -16384, 0, 32767])))
        .expect(1)
        .mount(&server)
        .await;
    let engine = engine_for(&server, None);

    let mut stream = engine
        .synthesize("Hello", &VoicePack::new("af_heart"), 1.0)
        .await
        .unwrap();
    let mut samples = Vec::new();
    while let Some(chunk) = stream.next().await {
        samples.extend(chunk.unwrap().samples);
    }

    assert_eq!(samples.len(), 4);
    assert_eq!(samples[0], 0.5);
    assert_eq!(samples[1], -0.5);
    assert_eq!(samples[2], 0.0);
    assert!(samples[3] > 0.99);
}

#[tokio::test]
async fn test_synthesize_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(&server)
        .await;
    let engine = engine_for(&server, None);

    let result = engine
        .synthesize("Hello", &VoicePack::new("af_heart"), 1.0)
        .await;

    match result {
        Err(TTSError::ProviderError(msg)) => assert!(msg.contains("model crashed")),
        Err(other) => panic!("expected provider error, got {other:?}"),
        Ok(_) => panic!("expected provider error"),
    }
}

#[tokio::test]
async fn test_api_key_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/audio/voices"))
        .and(header("authorization", "Bearer engine-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"voices": ["af_heart"]})))
        .expect(1)
        .mount(&server)
        .await;
    let engine = engine_for(&server, Some("engine-secret"));

    assert!(engine.load_voice("af_heart").await.is_ok());
}

#[tokio::test]
async fn test_unreachable_engine_is_network_error() {
    let engine = KokoroTTS::new(KokoroTTSConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        ..Default::default()
    })
    .unwrap();

    let err = engine.load_voice("af_heart").await.unwrap_err();

    assert!(matches!(err, TTSError::NetworkError(_)));
}

/// Voice lookup, fallback and synthesis through the shared cache
#[tokio::test]
async fn test_synthesizer_over_http_engine() {
    let server = MockServer::start().await;
    mount_voices(&server, &["af_heart"]).await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_partial_json(json!({"voice": "af_heart"})))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(pcm(&[100; 480])))
        .mount(&server)
        .await;

    let engine: Arc<dyn TtsEngine> = Arc::new(engine_for(&server, None));
    let cache = Arc::new(VoiceCache::with_engine(engine, 8, vec!["af_heart".to_string()]));
    let synthesizer = SegmentSynthesizer::new(cache.clone(), "af_heart");

    let buffer = synthesizer
        .synthesize("Hello", "zz_unknown", 1.0)
        .await
        .unwrap();

    assert_eq!(buffer.len(), 480);
    assert_eq!(buffer.sample_rate, 24_000);
    assert!(cache.contains("af_heart"));
    assert!(!cache.contains("zz_unknown"));
}
