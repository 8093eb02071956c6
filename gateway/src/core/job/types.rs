use axum::http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::JobErrorKind;

/// Envelope of an inbound job
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub input: JobInput,
}

/// Fields of a job as they arrive, before defaults are applied
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobInput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub project_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub chapter_id: Option<String>,
}

/// An explicit `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifiers are opaque; callers send them as strings or numbers.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number identifier, got {other}"
        ))),
    }
}

impl JobInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_ids(
        mut self,
        user_id: impl Into<String>,
        project_id: impl Into<String>,
        chapter_id: impl Into<String>,
    ) -> Self {
        self.user_id = Some(user_id.into());
        self.project_id = Some(project_id.into());
        self.chapter_id = Some(chapter_id.into());
        self
    }

    /// Apply request defaults
    pub fn into_request(self, default_voice: &str) -> JobRequest {
        JobRequest {
            text: self.text,
            voice: self
                .voice
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default_voice.to_string()),
            speed: self.speed.unwrap_or(1.0),
            user_id: self
                .user_id
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| "0".to_string()),
            project_id: self.project_id.unwrap_or_default(),
            chapter_id: self.chapter_id.unwrap_or_default(),
        }
    }
}

/// A job with every default resolved
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    pub text: String,
    pub voice: String,
    pub speed: f32,
    pub user_id: String,
    pub project_id: String,
    pub chapter_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSuccess {
    pub success: bool,
    pub audio_url: String,
    pub duration: f64,
    pub voice: String,
    pub text_length: usize,
    pub generation_time: f64,
    pub upload_time: f64,
    pub format: &'static str,
    pub sample_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobFailure {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
    #[serde(skip)]
    pub kind: JobErrorKind,
}

/// Outcome of a job, serialized as either record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JobResult {
    Success(JobSuccess),
    Failure(JobFailure),
}

impl JobResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// `400` for input errors, `500` for every other failure
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Success(_) => StatusCode::OK,
            Self::Failure(f) if f.kind == JobErrorKind::Input => StatusCode::BAD_REQUEST,
            Self::Failure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
