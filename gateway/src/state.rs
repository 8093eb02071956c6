use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::core::audio::AudioAssembler;
use crate::core::job::JobOrchestrator;
use crate::core::storage::{AudioUploader, ObjectStoreUploader};
use crate::core::tts::{EngineFactory, SegmentSynthesizer, VoiceCache, create_tts_engine};

/// Application state shared by every handler
pub struct AppState {
    pub config: ServerConfig,
    /// Process-wide engine handle and voice-pack cache
    pub voices: Arc<VoiceCache>,
    pub orchestrator: JobOrchestrator,
}

impl AppState {
    /// Build the state for a running server.
    ///
    /// The engine itself is not contacted here; it is built on the first job
    /// (or by `kokoro-gateway init`). Missing storage credentials are logged and
    /// surface later as per-job upload errors.
    pub async fn new(config: ServerConfig) -> Arc<Self> {
        let kokoro = config.kokoro_config();
        let factory: EngineFactory = Arc::new(move || create_tts_engine("kokoro", kokoro.clone()));
        let voices = Arc::new(VoiceCache::new(
            factory,
            config.voice_cache_capacity,
            config.preload_voices.clone(),
        ));

        let uploader = build_uploader(&config);

        Self::with_components(config, voices, uploader)
    }

    /// Assemble the state around an existing voice cache and uploader
    pub fn with_components(
        config: ServerConfig,
        voices: Arc<VoiceCache>,
        uploader: Option<Arc<dyn AudioUploader>>,
    ) -> Arc<Self> {
        let synthesizer = Arc::new(SegmentSynthesizer::new(
            voices.clone(),
            config.fallback_voice.clone(),
        ));
        let assembler = Arc::new(AudioAssembler::new(synthesizer, config.sample_rate));
        let orchestrator = JobOrchestrator::new(assembler, uploader)
            .with_key_prefix(config.storage_key_prefix.clone())
            .with_default_voice(config.default_voice.clone())
            .with_traceback(config.include_traceback);

        Arc::new(Self {
            config,
            voices,
            orchestrator,
        })
    }
}

fn build_uploader(config: &ServerConfig) -> Option<Arc<dyn AudioUploader>> {
    match config.r2_settings().build_store() {
        Ok(store) => {
            info!(bucket = %config.r2_bucket_name, "R2 storage configured");
            Some(Arc::new(ObjectStoreUploader::new(
                store,
                config.r2_public_url.clone(),
            )))
        }
        Err(e) => {
            warn!(error = %e, "R2 storage unavailable, jobs will fail at upload");
            None
        }
    }
}
