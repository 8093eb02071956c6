//! Process-wide engine handle and voice-pack cache.
//!
//! The engine is built on first use and then shared by every request in the
//! process. Building it also preloads the configured voice list, so common
//! voices are warm before the first job needs them.
//!
//! Concurrency:
//! - engine construction runs once, behind a `tokio::sync::OnceCell`, even
//!   when several requests arrive before it completes
//! - voice loads go through `moka`'s `try_get_with`, which coalesces
//!   concurrent loads of one voice and never caches a failed load

use std::sync::Arc;

use moka::future::Cache;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::base::{TTSError, TTSResult, TtsEngine, VoicePack};

/// Builds the engine on first use
pub type EngineFactory = Arc<dyn Fn() -> TTSResult<Arc<dyn TtsEngine>> + Send + Sync>;

/// Voices loaded when the engine is first built
pub const DEFAULT_PRELOAD_VOICES: &[&str] = &[
    "af_heart",
    "af_alloy",
    "af_nova",
    "af_bella",
    "am_michael",
    "af_sarah",
];

/// Default upper bound on cached voice packs
pub const DEFAULT_VOICE_CACHE_CAPACITY: u64 = 64;

pub struct VoiceCache {
    engine: OnceCell<Arc<dyn TtsEngine>>,
    factory: EngineFactory,
    packs: Cache<String, VoicePack>,
    preload: Vec<String>,
}

impl VoiceCache {
    pub fn new(factory: EngineFactory, capacity: u64, preload: Vec<String>) -> Self {
        Self {
            engine: OnceCell::new(),
            factory,
            packs: Cache::new(capacity),
            preload,
        }
    }

    /// Cache around an engine that already exists
    pub fn with_engine(engine: Arc<dyn TtsEngine>, capacity: u64, preload: Vec<String>) -> Self {
        let factory: EngineFactory = Arc::new(move || Ok(engine.clone()));
        Self::new(factory, capacity, preload)
    }

    /// Get the shared engine, building it and preloading voices on first use
    pub async fn engine(&self) -> TTSResult<Arc<dyn TtsEngine>> {
        let engine = self
            .engine
            .get_or_try_init(|| async {
                let engine = (self.factory)()?;
                info!(
                    provider = %engine.get_provider_info(),
                    "TTS engine initialized"
                );
                let loaded = self.preload_voices(&engine).await;
                info!(
                    loaded,
                    requested = self.preload.len(),
                    "Preloaded voice packs"
                );
                Ok::<_, TTSError>(engine)
            })
            .await?;

        Ok(engine.clone())
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.initialized()
    }

    async fn preload_voices(&self, engine: &Arc<dyn TtsEngine>) -> usize {
        let mut loaded = 0;
        for voice in &self.preload {
            match self.load(engine, voice).await {
                Ok(_) => loaded += 1,
                Err(e) => warn!(voice = %voice, error = %e, "Could not preload voice pack"),
            }
        }
        loaded
    }

    /// Resolve a voice pack, loading it from `engine` when it is not cached
    pub async fn load(&self, engine: &Arc<dyn TtsEngine>, voice_id: &str) -> TTSResult<VoicePack> {
        let engine = engine.clone();
        let id = voice_id.to_string();

        self.packs
            .try_get_with(voice_id.to_string(), async move {
                info!(voice = %id, "Loading voice pack");
                engine.load_voice(&id).await
            })
            .await
            .map_err(|e: Arc<TTSError>| (*e).clone())
    }

    pub fn contains(&self, voice_id: &str) -> bool {
        self.packs.contains_key(voice_id)
    }

    /// Identifiers of every cached voice pack, sorted
    pub fn cached_voices(&self) -> Vec<String> {
        let mut voices: Vec<String> = self.packs.iter().map(|(id, _)| (*id).clone()).collect();
        voices.sort();
        voices
    }

    /// Build the engine (if needed) and report the voices now cached
    pub async fn warm_up(&self) -> TTSResult<Vec<String>> {
        self.engine().await?;
        self.packs.run_pending_tasks().await;
        Ok(self.cached_voices())
    }
}
