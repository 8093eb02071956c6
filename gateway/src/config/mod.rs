//! Configuration module for the Kokoro gateway
//!
//! Configuration comes from .env files, YAML files and environment variables.
//! Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable readers
//! - `merge`: Merging YAML, environment and defaults
//!
//! # Example
//! ```rust,no_run
//! use kokoro_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod merge;
mod yaml;

use crate::core::storage::R2Settings;
use crate::core::tts::KokoroTTSConfig;

/// TLS configuration for HTTPS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Contains everything needed to run the gateway:
/// - Server settings (host, port, TLS)
/// - Kokoro engine endpoint and voice selection
/// - R2 storage credentials and key layout
/// - Security settings (CORS, rate limiting)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    // Kokoro engine
    pub engine_url: String,
    pub engine_api_key: Option<String>,
    pub engine_model: String,
    /// Rate of both synthesized speech and generated silence (Hz)
    pub sample_rate: u32,

    // Voices
    /// Voice used when a job does not name one
    pub default_voice: String,
    /// Voice tried once when the requested voice cannot be loaded
    pub fallback_voice: String,
    /// Voices loaded into the cache when the engine is first built
    pub preload_voices: Vec<String>,
    pub voice_cache_capacity: u64,

    // R2 storage
    pub r2_account_id: Option<String>,
    pub r2_access_key_id: Option<String>,
    pub r2_secret_access_key: Option<String>,
    pub r2_bucket_name: String,
    /// Base of the public URL returned to callers
    pub r2_public_url: String,
    /// Overrides the account-derived S3 endpoint
    pub r2_endpoint: Option<String>,
    pub storage_key_prefix: String,

    // Jobs
    /// Attach a diagnostic trace to error responses
    pub include_traceback: bool,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,

    // Rate limiting configuration
    /// Maximum requests per second per IP address
    /// Default: 60
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    /// Default: 10
    pub rate_limit_burst_size: u32,
}

/// Zeroize secret fields when ServerConfig is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.engine_api_key {
            key.zeroize();
        }
        if let Some(ref mut key) = self.r2_access_key_id {
            key.zeroize();
        }
        if let Some(ref mut secret) = self.r2_secret_access_key {
            secret.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and defaults
    ///
    /// # Errors
    /// Returns an error if a variable is present but cannot be parsed, or if
    /// only one of the TLS paths is set.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        merge::merge_config(None)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        // .env is loaded in main.rs, so by this point it is part of the environment
        let yaml_config = yaml::YamlConfig::from_file(path)?;

        merge::merge_config(Some(yaml_config))
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Settings for the Kokoro HTTP engine
    pub fn kokoro_config(&self) -> KokoroTTSConfig {
        KokoroTTSConfig {
            base_url: self.engine_url.clone(),
            api_key: self.engine_api_key.clone(),
            model: self.engine_model.clone(),
            sample_rate: self.sample_rate,
        }
    }

    /// Settings for the R2 bucket. Missing credentials stay `None`.
    pub fn r2_settings(&self) -> R2Settings {
        R2Settings {
            account_id: self.r2_account_id.clone(),
            access_key_id: self.r2_access_key_id.clone(),
            secret_access_key: self.r2_secret_access_key.clone(),
            bucket: self.r2_bucket_name.clone(),
            endpoint: self.r2_endpoint.clone(),
        }
    }

    /// Check if every storage credential is present
    pub fn has_storage(&self) -> bool {
        (self.r2_account_id.is_some() || self.r2_endpoint.is_some())
            && self.r2_access_key_id.is_some()
            && self.r2_secret_access_key.is_some()
    }
}
