//! Text-to-speech engine layer.
//!
//! - `base` - the engine capability (`TtsEngine`) and its data types
//! - `kokoro` - HTTP client for a Kokoro inference server
//! - `voice_cache` - process-wide lazy engine handle and voice-pack cache
//! - `synthesizer` - per-segment synthesis with single-step voice fallback

mod base;
pub mod kokoro;
pub mod synthesizer;
pub mod voice_cache;

#[cfg(test)]
pub(crate) use base::testing;

pub use base::{ChunkStream, EngineChunk, TTSError, TTSResult, TtsEngine, VoicePack};
pub use kokoro::{DEFAULT_KOKORO_MODEL, DEFAULT_KOKORO_URL, KokoroTTS, KokoroTTSConfig};
pub use synthesizer::{DEFAULT_FALLBACK_VOICE, SegmentSynthesizer};
pub use voice_cache::{
    DEFAULT_PRELOAD_VOICES, DEFAULT_VOICE_CACHE_CAPACITY, EngineFactory, VoiceCache,
};
use std::sync::Arc;

/// Factory function to create a TTS engine by provider name.
///
/// # Supported Providers
///
/// - `"kokoro"` - Kokoro-82M over an HTTP inference server
pub fn create_tts_engine(provider_type: &str, config: KokoroTTSConfig) -> TTSResult<Arc<dyn TtsEngine>> {
    match provider_type.to_lowercase().as_str() {
        "kokoro" | "kokoro-82m" | "kokoro-fastapi" => Ok(Arc::new(KokoroTTS::new(config)?)),
        _ => Err(TTSError::InvalidConfiguration(format!(
            "Unsupported TTS provider: {provider_type}. Supported providers: kokoro"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_kokoro_engine() {
        let engine = create_tts_engine("kokoro", KokoroTTSConfig::default());
        assert!(engine.is_ok());
        assert_eq!(engine.unwrap().sample_rate(), 24_000);
    }

    #[test]
    fn test_create_engine_case_insensitive() {
        assert!(create_tts_engine("Kokoro", KokoroTTSConfig::default()).is_ok());
        assert!(create_tts_engine("KOKORO-FASTAPI", KokoroTTSConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_provider_error_message() {
        match create_tts_engine("invalid_provider", KokoroTTSConfig::default()) {
            Err(TTSError::InvalidConfiguration(msg)) => {
                assert!(
                    msg.contains("kokoro"),
                    "Error message should mention kokoro as a supported provider"
                );
            }
            Err(other) => panic!("Expected InvalidConfiguration error, got: {:?}", other),
            Ok(_) => panic!("Expected error for invalid provider"),
        }
    }
}
