use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::core::audio::assembler::AssemblyError;
use crate::core::storage::StorageError;
use crate::core::tts::TTSError;

/// Failure of a single job. Every variant is scoped to its request.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("No text provided")]
    MissingText,

    /// Assembly finished but produced zero samples
    #[error("No audio generated")]
    NoAudioGenerated,

    #[error(transparent)]
    Synthesis(#[from] TTSError),

    #[error("WAV encoding failed: {0}")]
    Encoding(#[from] hound::Error),

    #[error(transparent)]
    Upload(#[from] StorageError),
}

/// Coarse category of a [`JobError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobErrorKind {
    Input,
    Synthesis,
    Encoding,
    Upload,
}

impl JobErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "InputError",
            Self::Synthesis => "SynthesisError",
            Self::Encoding => "EncodingError",
            Self::Upload => "UploadError",
        }
    }
}

impl fmt::Display for JobErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JobError {
    pub fn kind(&self) -> JobErrorKind {
        match self {
            Self::MissingText => JobErrorKind::Input,
            Self::NoAudioGenerated | Self::Synthesis(_) => JobErrorKind::Synthesis,
            Self::Encoding(_) => JobErrorKind::Encoding,
            Self::Upload(_) => JobErrorKind::Upload,
        }
    }
}

impl From<AssemblyError> for JobError {
    fn from(err: AssemblyError) -> Self {
        match err {
            AssemblyError::NoAudioGenerated => Self::NoAudioGenerated,
            AssemblyError::Synthesis(e) => Self::Synthesis(e),
        }
    }
}

/// Display strings of `err` followed by each of its sources
pub fn error_chain(err: &(dyn StdError + 'static)) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain
}
