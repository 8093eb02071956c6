use async_stream::try_stream;
use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

use super::config::{KokoroTTSConfig, SpeechRequest, VoicesResponse};
use crate::core::tts::base::{
    ChunkStream, EngineChunk, TTSError, TTSResult, TtsEngine, VoicePack,
};

/// Decode little-endian 16-bit PCM into `f32` samples.
///
/// Network chunks do not respect sample boundaries, so a trailing odd byte is
/// parked in `carry` and joined with the first byte of the next chunk.
fn decode_pcm16(carry: &mut Option<u8>, bytes: &[u8]) -> Vec<f32> {
    let mut samples = Vec::with_capacity(bytes.len() / 2 + 1);
    let mut rest = bytes;

    if let Some(low) = carry.take() {
        match rest.split_first() {
            Some((&high, tail)) => {
                samples.push(i16::from_le_bytes([low, high]) as f32 / 32768.0);
                rest = tail;
            }
            None => {
                *carry = Some(low);
                return samples;
            }
        }
    }

    let mut pairs = rest.chunks_exact(2);
    for pair in &mut pairs {
        samples.push(i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0);
    }
    if let [odd] = pairs.remainder() {
        *carry = Some(*odd);
    }

    samples
}

/// Kokoro engine backed by an HTTP inference server
pub struct KokoroTTS {
    client: reqwest::Client,
    config: KokoroTTSConfig,
}

impl KokoroTTS {
    pub fn new(config: KokoroTTSConfig) -> TTSResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(TTSError::InvalidConfiguration(
                "Kokoro engine URL must not be empty".to_string(),
            ));
        }
        if config.sample_rate == 0 {
            return Err(TTSError::InvalidConfiguration(
                "Kokoro sample rate must be positive".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TTSError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &KokoroTTSConfig {
        &self.config
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) if !key.is_empty() => request.bearer_auth(key),
            _ => request,
        }
    }

    /// Fetch the identifiers of every voice the server can speak with
    pub async fn list_voices(&self) -> TTSResult<Vec<String>> {
        let response = self
            .authorized(self.client.get(self.config.voices_url()))
            .send()
            .await
            .map_err(|e| TTSError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TTSError::ProviderError(format!(
                "Kokoro voice listing failed with status {status}: {body}"
            )));
        }

        let voices: VoicesResponse = response
            .json()
            .await
            .map_err(|e| TTSError::ProviderError(format!("Invalid voices response: {e}")))?;

        Ok(voices.voices)
    }
}

#[async_trait]
impl TtsEngine for KokoroTTS {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    async fn load_voice(&self, voice_id: &str) -> TTSResult<VoicePack> {
        let voices = self.list_voices().await?;
        if voices.iter().any(|v| v == voice_id) {
            Ok(VoicePack::new(voice_id))
        } else {
            Err(TTSError::VoiceNotFound(voice_id.to_string()))
        }
    }

    async fn synthesize(
        &self,
        text: &str,
        voice: &VoicePack,
        speed: f32,
    ) -> TTSResult<ChunkStream> {
        let body = SpeechRequest {
            model: &self.config.model,
            input: text,
            voice: voice.id(),
            speed,
            response_format: "pcm",
            stream: true,
        };

        debug!(
            voice = voice.id(),
            speed,
            chars = text.len(),
            "Requesting Kokoro speech"
        );

        let response = self
            .authorized(self.client.post(self.config.speech_url()))
            .json(&body)
            .send()
            .await
            .map_err(|e| TTSError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TTSError::ProviderError(format!(
                "Kokoro speech request failed with status {status}: {body}"
            )));
        }

        let mut bytes = response.bytes_stream();
        let stream: ChunkStream = Box::pin(try_stream! {
            let mut carry = None;
            while let Some(chunk) = bytes.next().await {
                let chunk = chunk.map_err(|e| TTSError::NetworkError(e.to_string()))?;
                let samples = decode_pcm16(&mut carry, &chunk);
                if !samples.is_empty() {
                    yield EngineChunk::audio(samples);
                }
            }
        });

        Ok(stream)
    }

    fn get_provider_info(&self) -> serde_json::Value {
        serde_json::json!({
            "provider": "kokoro",
            "api_type": "HTTP REST",
            "model": self.config.model,
            "endpoint": self.config.base_url,
            "sample_rate": self.config.sample_rate,
            "response_format": "pcm",
        })
    }
}
