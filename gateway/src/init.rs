//! Initialization helpers for preparing the engine before starting the
//! gateway.
//!
//! This module powers the `kokoro-gateway init` CLI command. The command
//! builds the engine client and loads the configured preload voices, which
//! confirms the inference server is reachable and knows those voices.
//!
//! ```text
//! $ KOKORO_ENGINE_URL=http://kokoro:8880 kokoro-gateway init
//! ```

use std::sync::Arc;

use anyhow::{Result, anyhow};

use crate::config::ServerConfig;
use crate::core::tts::{EngineFactory, VoiceCache, create_tts_engine};

/// Build the engine and preload voices, returning the voices now cached.
pub async fn warm_up(voices: &VoiceCache) -> Result<Vec<String>> {
    let cached = voices
        .warm_up()
        .await
        .map_err(|e| anyhow!("Failed to initialize the Kokoro engine: {e}"))?;
    Ok(cached)
}

/// Entry point of `kokoro-gateway init`.
pub async fn run(config: &ServerConfig) -> Result<()> {
    let kokoro = config.kokoro_config();
    tracing::info!(url = %kokoro.base_url, "Initializing Kokoro engine");

    let factory: EngineFactory = Arc::new(move || create_tts_engine("kokoro", kokoro.clone()));
    let voices = VoiceCache::new(
        factory,
        config.voice_cache_capacity,
        config.preload_voices.clone(),
    );

    let cached = warm_up(&voices).await?;
    let missing: Vec<&String> = config
        .preload_voices
        .iter()
        .filter(|v| !cached.contains(v))
        .collect();

    tracing::info!(voices = ?cached, "Voice packs ready");
    if !missing.is_empty() {
        tracing::warn!(voices = ?missing, "Some preload voices are unavailable");
    }

    Ok(())
}
