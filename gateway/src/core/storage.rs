//! Object storage for rendered audio.
//!
//! Uploads go through the `object_store` crate. In production the store is
//! Cloudflare R2 reached through its S3-compatible API; tests use the
//! in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::{
    Attribute, Attributes, ObjectStore, PutOptions, PutPayload, aws::AmazonS3Builder,
    path::Path as ObjectPath,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("R2 storage is not configured (missing {0})")]
    NotConfigured(&'static str),
    #[error("Invalid storage key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
    #[error("R2 upload failed: {0}")]
    Store(#[from] object_store::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Where finished audio files are published
#[async_trait]
pub trait AudioUploader: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing object
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &'static str)
    -> StorageResult<()>;

    /// Public URL the object under `key` is served from
    fn public_url(&self, key: &str) -> String;
}

/// Credentials and addressing for an R2 bucket
#[derive(Debug, Clone, Default)]
pub struct R2Settings {
    pub account_id: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub bucket: String,
    /// Overrides the account-derived endpoint
    pub endpoint: Option<String>,
}

impl R2Settings {
    /// `https://<account>.r2.cloudflarestorage.com` unless overridden
    pub fn endpoint(&self) -> Option<String> {
        self.endpoint.clone().or_else(|| {
            self.account_id
                .as_ref()
                .map(|account| format!("https://{account}.r2.cloudflarestorage.com"))
        })
    }

    /// Build the S3 client for this bucket.
    ///
    /// Only presence of each setting is checked; bad credentials surface on
    /// the first upload.
    pub fn build_store(&self) -> StorageResult<Arc<dyn ObjectStore>> {
        let endpoint = self
            .endpoint()
            .ok_or(StorageError::NotConfigured("R2_ACCOUNT_ID"))?;
        let access_key = self
            .access_key_id
            .as_ref()
            .ok_or(StorageError::NotConfigured("R2_ACCESS_KEY_ID"))?;
        let secret_key = self
            .secret_access_key
            .as_ref()
            .ok_or(StorageError::NotConfigured("R2_SECRET_ACCESS_KEY"))?;

        let allow_http = endpoint.starts_with("http://");
        let store = AmazonS3Builder::new()
            .with_bucket_name(&self.bucket)
            .with_region("auto")
            .with_endpoint(endpoint)
            .with_allow_http(allow_http)
            .with_access_key_id(access_key)
            .with_secret_access_key(secret_key)
            .build()?;

        Ok(Arc::new(store))
    }
}

/// [`AudioUploader`] over any `object_store` backend
pub struct ObjectStoreUploader {
    store: Arc<dyn ObjectStore>,
    public_base: String,
}

impl ObjectStoreUploader {
    pub fn new(store: Arc<dyn ObjectStore>, public_base: impl Into<String>) -> Self {
        Self {
            store,
            public_base: public_base.into(),
        }
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }
}

#[async_trait]
impl AudioUploader for ObjectStoreUploader {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &'static str,
    ) -> StorageResult<()> {
        let path = ObjectPath::parse(key).map_err(|e| StorageError::InvalidKey {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        let size = bytes.len();
        self.store
            .put_opts(&path, PutPayload::from(Bytes::from(bytes)), options)
            .await?;

        debug!(key = %key, size, "Stored audio object");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base.trim_end_matches('/'), key)
    }
}
