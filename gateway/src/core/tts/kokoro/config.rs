//! Configuration and wire types for a Kokoro inference server.
//!
//! The server speaks the OpenAI-compatible speech API popularised by
//! Kokoro-FastAPI: voices are listed at `/v1/audio/voices` and speech is
//! rendered at `/v1/audio/speech`.

use serde::{Deserialize, Serialize};

use crate::core::audio::KOKORO_SAMPLE_RATE;

/// Default address of a locally running Kokoro server
pub const DEFAULT_KOKORO_URL: &str = "http://localhost:8880";

/// Model name sent with every speech request
pub const DEFAULT_KOKORO_MODEL: &str = "kokoro";

/// Connection settings for the Kokoro engine
#[derive(Debug, Clone, PartialEq)]
pub struct KokoroTTSConfig {
    /// Base URL of the inference server, without a trailing slash
    pub base_url: String,
    /// Optional bearer token
    pub api_key: Option<String>,
    pub model: String,
    /// Sample rate of the raw PCM the server streams back
    pub sample_rate: u32,
}

impl Default for KokoroTTSConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_KOKORO_URL.to_string(),
            api_key: None,
            model: DEFAULT_KOKORO_MODEL.to_string(),
            sample_rate: KOKORO_SAMPLE_RATE,
        }
    }
}

impl KokoroTTSConfig {
    pub fn voices_url(&self) -> String {
        format!("{}/v1/audio/voices", self.base_url.trim_end_matches('/'))
    }

    pub fn speech_url(&self) -> String {
        format!("{}/v1/audio/speech", self.base_url.trim_end_matches('/'))
    }
}

/// Body of `POST /v1/audio/speech`
#[derive(Debug, Clone, Serialize)]
pub struct SpeechRequest<'a> {
    pub model: &'a str,
    pub input: &'a str,
    pub voice: &'a str,
    pub speed: f32,
    pub response_format: &'static str,
    pub stream: bool,
}

/// Body of `GET /v1/audio/voices`
#[derive(Debug, Clone, Deserialize)]
pub struct VoicesResponse {
    #[serde(default)]
    pub voices: Vec<String>,
}
