//! Per-segment speech synthesis.

use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, warn};

use super::base::{TTSResult, TtsEngine, VoicePack};
use super::voice_cache::VoiceCache;
use crate::core::audio::SampleBuffer;

/// Voice used when the requested one cannot be loaded
pub const DEFAULT_FALLBACK_VOICE: &str = "af_heart";

/// Turns one piece of text into one contiguous sample buffer.
pub struct SegmentSynthesizer {
    voices: Arc<VoiceCache>,
    fallback_voice: String,
}

impl SegmentSynthesizer {
    pub fn new(voices: Arc<VoiceCache>, fallback_voice: impl Into<String>) -> Self {
        Self {
            voices,
            fallback_voice: fallback_voice.into(),
        }
    }

    pub fn voices(&self) -> &Arc<VoiceCache> {
        &self.voices
    }

    pub fn fallback_voice(&self) -> &str {
        &self.fallback_voice
    }

    /// Resolve `voice`, falling back exactly once to the fallback voice.
    ///
    /// A failure of the fallback load is returned as-is.
    pub async fn resolve_voice(
        &self,
        engine: &Arc<dyn TtsEngine>,
        voice: &str,
    ) -> TTSResult<VoicePack> {
        match self.voices.load(engine, voice).await {
            Ok(pack) => Ok(pack),
            Err(e) => {
                warn!(
                    voice = %voice,
                    fallback = %self.fallback_voice,
                    error = %e,
                    "Voice pack unavailable, using fallback voice"
                );
                self.voices.load(engine, &self.fallback_voice).await
            }
        }
    }

    /// Synthesize `text` and drain the engine stream into one buffer.
    ///
    /// An engine that yields no chunks produces an empty buffer, not an error.
    pub async fn synthesize(&self, text: &str, voice: &str, speed: f32) -> TTSResult<SampleBuffer> {
        let engine = self.voices.engine().await?;
        let pack = self.resolve_voice(&engine, voice).await?;

        let mut stream = engine.synthesize(text, &pack, speed).await?;
        let mut samples = Vec::new();
        let mut chunks = 0usize;
        while let Some(chunk) = stream.next().await {
            samples.extend_from_slice(&chunk?.samples);
            chunks += 1;
        }

        debug!(
            voice = pack.id(),
            chunks,
            samples = samples.len(),
            "Segment synthesized"
        );

        Ok(SampleBuffer::new(samples, engine.sample_rate()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tts::base::TTSError;
    use crate::core::tts::base::testing::ScriptedEngine;

    fn synthesizer(engine: Arc<ScriptedEngine>) -> SegmentSynthesizer {
        let cache = VoiceCache::with_engine(engine, 8, Vec::new());
        SegmentSynthesizer::new(Arc::new(cache), DEFAULT_FALLBACK_VOICE)
    }

    #[tokio::test]
    async fn test_chunks_are_concatenated() {
        let engine = Arc::new(ScriptedEngine::with_voices(&["af_heart", "am_michael"]));
        let synth = synthesizer(engine.clone());

        let buffer = synth.synthesize("Hello", "am_michael", 1.2).await.unwrap();

        // 5 chars * 10 samples, streamed in chunks of 7
        assert_eq!(buffer.len(), 50);
        assert_eq!(buffer.sample_rate, 24_000);
        let calls = engine.synth_calls.lock();
        assert_eq!(calls[0], ("Hello".to_string(), "am_michael".to_string(), 1.2));
    }

    #[tokio::test]
    async fn test_unknown_voice_falls_back_once() {
        let engine = Arc::new(ScriptedEngine::with_voices(&["af_heart"]));
        let synth = synthesizer(engine.clone());

        let buffer = synth.synthesize("Hi", "xx_missing", 1.0).await.unwrap();

        assert_eq!(buffer.len(), 20);
        assert_eq!(engine.loads_of("xx_missing"), 1);
        assert_eq!(engine.loads_of("af_heart"), 1);
        assert_eq!(engine.synth_calls.lock()[0].1, "af_heart");
    }

    #[tokio::test]
    async fn test_fallback_failure_propagates() {
        let engine = Arc::new(ScriptedEngine::with_voices(&[]));
        let synth = synthesizer(engine.clone());

        let err = synth.synthesize("Hi", "xx_missing", 1.0).await.unwrap_err();

        assert_eq!(err, TTSError::VoiceNotFound("af_heart".to_string()));
        assert_eq!(engine.loads_of("xx_missing"), 1);
        assert_eq!(engine.loads_of("af_heart"), 1);
        assert!(engine.synth_calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_empty_stream_yields_empty_buffer() {
        let engine = Arc::new(ScriptedEngine::with_voices(&["af_heart"]).silent_on("..."));
        let synth = synthesizer(engine);

        let buffer = synth.synthesize("...", "af_heart", 1.0).await.unwrap();

        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn test_engine_error_propagates() {
        let engine = Arc::new(ScriptedEngine::with_voices(&["af_heart"]).failing_on("boom"));
        let synth = synthesizer(engine);

        let err = synth.synthesize("boom", "af_heart", 1.0).await.unwrap_err();

        assert!(matches!(err, TTSError::AudioGenerationFailed(_)));
    }
}
