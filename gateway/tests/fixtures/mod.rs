//! Test Fixtures Module
//!
//! Shared helpers for the integration tests:
//! - `FakeEngine`, an in-process `TtsEngine` with scripted output
//! - configuration and state builders backed by in-memory storage

// Not every test binary uses every helper
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::stream;
use object_store::memory::InMemory;
use parking_lot::Mutex;

use kokoro_gateway::core::storage::{AudioUploader, ObjectStoreUploader};
use kokoro_gateway::core::tts::{ChunkStream, EngineChunk, TTSError, TTSResult, TtsEngine, VoicePack};
use kokoro_gateway::{AppState, ServerConfig, VoiceCache};

pub const PUBLIC_URL: &str = "https://audio.example.com";

/// Samples emitted per input character
pub const SAMPLES_PER_CHAR: usize = 10;

/// Engine fake: every character becomes `SAMPLES_PER_CHAR` samples of 0.5,
/// streamed in chunks of three characters.
pub struct FakeEngine {
    voices: HashSet<String>,
    silent: HashSet<String>,
    pub loads: AtomicUsize,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeEngine {
    pub fn new(voices: &[&str]) -> Self {
        Self {
            voices: voices.iter().map(|v| v.to_string()).collect(),
            silent: HashSet::new(),
            loads: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Yield no chunks for `text`
    pub fn silent_on(mut self, text: &str) -> Self {
        self.silent.insert(text.to_string());
        self
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn voices_used(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(_, v)| v.clone()).collect()
    }
}

#[async_trait]
impl TtsEngine for FakeEngine {
    fn sample_rate(&self) -> u32 {
        24_000
    }

    async fn load_voice(&self, voice_id: &str) -> TTSResult<VoicePack> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.voices.contains(voice_id) {
            Ok(VoicePack::new(voice_id))
        } else {
            Err(TTSError::VoiceNotFound(voice_id.to_string()))
        }
    }

    async fn synthesize(&self, text: &str, voice: &VoicePack, _speed: f32) -> TTSResult<ChunkStream> {
        self.calls
            .lock()
            .push((text.to_string(), voice.id().to_string()));

        if self.silent.contains(text) {
            return Ok(Box::pin(stream::empty::<TTSResult<EngineChunk>>()));
        }

        let chars: Vec<char> = text.chars().collect();
        let chunks: Vec<TTSResult<EngineChunk>> = chars
            .chunks(3)
            .map(|group| Ok(EngineChunk::audio(vec![0.5; group.len() * SAMPLES_PER_CHAR])))
            .collect();
        Ok(Box::pin(stream::iter(chunks)))
    }
}

/// Configuration with defaults and no storage credentials
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        tls: None,
        engine_url: "http://localhost:8880".to_string(),
        engine_api_key: None,
        engine_model: "kokoro".to_string(),
        sample_rate: 24_000,
        default_voice: "af_heart".to_string(),
        fallback_voice: "af_heart".to_string(),
        preload_voices: Vec::new(),
        voice_cache_capacity: 16,
        r2_account_id: None,
        r2_access_key_id: None,
        r2_secret_access_key: None,
        r2_bucket_name: "audio-studio".to_string(),
        r2_public_url: PUBLIC_URL.to_string(),
        r2_endpoint: None,
        storage_key_prefix: "kokoro_audio".to_string(),
        include_traceback: false,
        cors_allowed_origins: None,
        rate_limit_requests_per_second: 60,
        rate_limit_burst_size: 10,
    }
}

/// State around `engine`, storing uploads in the returned in-memory store
pub fn state_with(config: ServerConfig, engine: Arc<FakeEngine>) -> (Arc<AppState>, Arc<InMemory>) {
    let store = Arc::new(InMemory::new());
    let uploader: Arc<dyn AudioUploader> =
        Arc::new(ObjectStoreUploader::new(store.clone(), PUBLIC_URL));
    let voices = Arc::new(VoiceCache::with_engine(
        engine,
        config.voice_cache_capacity,
        config.preload_voices.clone(),
    ));
    (
        AppState::with_components(config, voices, Some(uploader)),
        store,
    )
}

/// State around `engine` with no storage configured
pub fn state_without_storage(config: ServerConfig, engine: Arc<FakeEngine>) -> Arc<AppState> {
    let voices = Arc::new(VoiceCache::with_engine(
        engine,
        config.voice_cache_capacity,
        config.preload_voices.clone(),
    ));
    AppState::with_components(config, voices, None)
}
