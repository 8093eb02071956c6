use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

/// Errors raised by a TTS engine or while resolving voice packs
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TTSError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Provider error: {0}")]
    ProviderError(String),
    #[error("Voice not found: {0}")]
    VoiceNotFound(String),
    #[error("Audio generation failed: {0}")]
    AudioGenerationFailed(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type TTSResult<T> = Result<T, TTSError>;

/// Opaque resource an engine needs to speak with a given voice identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoicePack {
    id: String,
}

impl VoicePack {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Identifier the pack was loaded for
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// One piece of streamed engine output.
///
/// `graphemes` and `phonemes` are engine bookkeeping and may be empty; only
/// `samples` contributes to the rendered audio.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineChunk {
    pub graphemes: String,
    pub phonemes: String,
    pub samples: Vec<f32>,
}

impl EngineChunk {
    pub fn audio(samples: Vec<f32>) -> Self {
        Self {
            samples,
            ..Default::default()
        }
    }
}

/// Lazily produced engine output for one synthesis call
pub type ChunkStream = BoxStream<'static, TTSResult<EngineChunk>>;

/// Capability of a text-to-speech inference engine.
///
/// Implementations must be shareable across requests: the gateway holds a
/// single engine per process behind an `Arc`.
#[async_trait]
pub trait TtsEngine: Send + Sync {
    /// Sample rate of every chunk this engine emits (Hz)
    fn sample_rate(&self) -> u32;

    /// Load the voice pack for `voice_id`
    async fn load_voice(&self, voice_id: &str) -> TTSResult<VoicePack>;

    /// Start synthesizing `text`; audio arrives through the returned stream
    async fn synthesize(&self, text: &str, voice: &VoicePack, speed: f32)
    -> TTSResult<ChunkStream>;

    /// Provider metadata for diagnostics
    fn get_provider_info(&self) -> serde_json::Value {
        serde_json::json!({ "sample_rate": self.sample_rate() })
    }
}
