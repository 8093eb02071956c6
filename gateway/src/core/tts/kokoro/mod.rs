//! Kokoro TTS engine.
//!
//! Talks to a Kokoro-82M inference server over HTTP and streams raw
//! 24kHz 16-bit mono PCM back as `f32` chunks.
//!
//! # Example
//!
//! ```rust,ignore
//! use kokoro_gateway::core::tts::{KokoroTTS, KokoroTTSConfig, TtsEngine};
//!
//! let engine = KokoroTTS::new(KokoroTTSConfig::default())?;
//! let voice = engine.load_voice("af_heart").await?;
//! let mut chunks = engine.synthesize("Hello, world!", &voice, 1.0).await?;
//! ```

mod config;
mod provider;

pub use config::{
    DEFAULT_KOKORO_MODEL, DEFAULT_KOKORO_URL, KokoroTTSConfig, SpeechRequest, VoicesResponse,
};
pub use provider::KokoroTTS;
