use std::error::Error;
use std::path::PathBuf;

use super::yaml::YamlConfig;
use super::{ServerConfig, TlsConfig, env};
use crate::core::audio::KOKORO_SAMPLE_RATE;
use crate::core::job::DEFAULT_KEY_PREFIX;
use crate::core::tts::{
    DEFAULT_FALLBACK_VOICE, DEFAULT_KOKORO_MODEL, DEFAULT_KOKORO_URL, DEFAULT_PRELOAD_VOICES,
    DEFAULT_VOICE_CACHE_CAPACITY,
};

pub(crate) const DEFAULT_HOST: &str = "0.0.0.0";
pub(crate) const DEFAULT_PORT: u16 = 8000;
pub(crate) const DEFAULT_BUCKET: &str = "audio-studio";

/// Build the final configuration.
///
/// Each value is taken from YAML first, then the environment, then the
/// built-in default.
pub(crate) fn merge_config(yaml: Option<YamlConfig>) -> Result<ServerConfig, Box<dyn Error>> {
    let yaml = yaml.unwrap_or_default();
    let server = yaml.server.unwrap_or_default();
    let engine = yaml.engine.unwrap_or_default();
    let voices = yaml.voices.unwrap_or_default();
    let storage = yaml.storage.unwrap_or_default();
    let jobs = yaml.jobs.unwrap_or_default();
    let security = yaml.security.unwrap_or_default();

    let host = server
        .host
        .or_else(|| env::var("HOST"))
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = match server.port {
        Some(port) => port,
        None => env::parse("PORT")?.unwrap_or(DEFAULT_PORT),
    };

    let tls = merge_tls(server.tls)?;

    let sample_rate = match engine.sample_rate {
        Some(rate) => rate,
        None => env::parse("KOKORO_SAMPLE_RATE")?.unwrap_or(KOKORO_SAMPLE_RATE),
    };
    if sample_rate == 0 {
        return Err("KOKORO_SAMPLE_RATE must be greater than zero".into());
    }

    let voice_cache_capacity = match voices.cache_capacity {
        Some(capacity) => capacity,
        None => env::parse("VOICE_CACHE_CAPACITY")?.unwrap_or(DEFAULT_VOICE_CACHE_CAPACITY),
    };

    let include_traceback = match jobs.include_traceback {
        Some(include) => include,
        None => env::flag("INCLUDE_TRACEBACK")?.unwrap_or(false),
    };

    let rate_limit_requests_per_second = match security.rate_limit_requests_per_second {
        Some(rps) => rps,
        None => env::parse("RATE_LIMIT_REQUESTS_PER_SECOND")?.unwrap_or(60),
    };
    let rate_limit_burst_size = match security.rate_limit_burst_size {
        Some(burst) => burst,
        None => env::parse("RATE_LIMIT_BURST_SIZE")?.unwrap_or(10),
    };

    Ok(ServerConfig {
        host,
        port,
        tls,
        engine_url: engine
            .url
            .or_else(|| env::var("KOKORO_ENGINE_URL"))
            .unwrap_or_else(|| DEFAULT_KOKORO_URL.to_string()),
        engine_api_key: engine.api_key.or_else(|| env::var("KOKORO_API_KEY")),
        engine_model: engine
            .model
            .or_else(|| env::var("KOKORO_MODEL"))
            .unwrap_or_else(|| DEFAULT_KOKORO_MODEL.to_string()),
        sample_rate,
        default_voice: voices
            .default
            .or_else(|| env::var("KOKORO_DEFAULT_VOICE"))
            .unwrap_or_else(|| DEFAULT_FALLBACK_VOICE.to_string()),
        fallback_voice: voices
            .fallback
            .or_else(|| env::var("KOKORO_FALLBACK_VOICE"))
            .unwrap_or_else(|| DEFAULT_FALLBACK_VOICE.to_string()),
        preload_voices: voices
            .preload
            .or_else(|| env::list("KOKORO_PRELOAD_VOICES"))
            .unwrap_or_else(|| DEFAULT_PRELOAD_VOICES.iter().map(|v| v.to_string()).collect()),
        voice_cache_capacity,
        r2_account_id: storage.account_id.or_else(|| env::var("R2_ACCOUNT_ID")),
        r2_access_key_id: storage.access_key_id.or_else(|| env::var("R2_ACCESS_KEY_ID")),
        r2_secret_access_key: storage
            .secret_access_key
            .or_else(|| env::var("R2_SECRET_ACCESS_KEY")),
        r2_bucket_name: storage
            .bucket
            .or_else(|| env::var("R2_BUCKET_NAME"))
            .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
        r2_public_url: storage
            .public_url
            .or_else(|| env::var("R2_PUBLIC_URL"))
            .unwrap_or_default(),
        r2_endpoint: storage.endpoint.or_else(|| env::var("R2_ENDPOINT")),
        storage_key_prefix: storage
            .key_prefix
            .or_else(|| env::var("STORAGE_KEY_PREFIX"))
            .unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string()),
        include_traceback,
        cors_allowed_origins: security
            .cors_allowed_origins
            .or_else(|| env::var("CORS_ALLOWED_ORIGINS")),
        rate_limit_requests_per_second,
        rate_limit_burst_size,
    })
}

fn merge_tls(yaml: Option<super::yaml::TlsYaml>) -> Result<Option<TlsConfig>, Box<dyn Error>> {
    let yaml = yaml.unwrap_or_default();
    if yaml.enabled == Some(false) {
        return Ok(None);
    }

    let cert = yaml.cert_path.or_else(|| env::var("TLS_CERT_PATH"));
    let key = yaml.key_path.or_else(|| env::var("TLS_KEY_PATH"));

    match (cert, key) {
        (Some(cert_path), Some(key_path)) => Ok(Some(TlsConfig {
            cert_path: PathBuf::from(cert_path),
            key_path: PathBuf::from(key_path),
        })),
        (None, None) if yaml.enabled != Some(true) => Ok(None),
        _ => Err("TLS requires both TLS_CERT_PATH and TLS_KEY_PATH".into()),
    }
}
