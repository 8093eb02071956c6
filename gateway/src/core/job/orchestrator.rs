//! End-to-end job pipeline.
//!
//! A job moves through `Validating -> Synthesizing -> Encoding -> Uploading`
//! and ends in `Succeeded` or `Failed`. The first failing stage ends the job;
//! nothing is retried and no partial result is reported.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use super::key::{DEFAULT_KEY_PREFIX, storage_key};
use super::types::{JobFailure, JobInput, JobRequest, JobResult, JobSuccess};
use crate::core::audio::{AudioAssembler, WAV_CONTENT_TYPE, encode_wav};
use crate::core::markers::parse;
use crate::core::storage::{AudioUploader, StorageError};
use crate::core::tts::DEFAULT_FALLBACK_VOICE;
use crate::errors::{JobError, error_chain};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Validating,
    Synthesizing,
    Encoding,
    Uploading,
    Succeeded,
    Failed,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Synthesizing => "synthesizing",
            Self::Encoding => "encoding",
            Self::Uploading => "uploading",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A job error together with the stage it happened in
#[derive(Debug)]
pub struct JobFailed {
    pub stage: JobStage,
    pub error: JobError,
}

impl JobFailed {
    fn at(stage: JobStage) -> impl FnOnce(JobError) -> Self {
        move |error| Self { stage, error }
    }

    /// Stage, kind and the full cause chain, one per line
    pub fn traceback(&self) -> String {
        let mut lines = vec![format!(
            "{} during {}",
            self.error.kind(),
            self.stage
        )];
        for (depth, cause) in error_chain(&self.error).into_iter().enumerate() {
            if depth == 0 {
                lines.push(format!("  error: {cause}"));
            } else {
                lines.push(format!("  caused by: {cause}"));
            }
        }
        lines.join("\n")
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub struct JobOrchestrator {
    assembler: Arc<AudioAssembler>,
    uploader: Option<Arc<dyn AudioUploader>>,
    key_prefix: String,
    default_voice: String,
    include_traceback: bool,
}

impl JobOrchestrator {
    /// `uploader` is `None` when storage is not configured; jobs then fail
    /// at the upload stage.
    pub fn new(assembler: Arc<AudioAssembler>, uploader: Option<Arc<dyn AudioUploader>>) -> Self {
        Self {
            assembler,
            uploader,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            default_voice: DEFAULT_FALLBACK_VOICE.to_string(),
            include_traceback: false,
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn with_default_voice(mut self, voice: impl Into<String>) -> Self {
        self.default_voice = voice.into();
        self
    }

    pub fn with_traceback(mut self, include: bool) -> Self {
        self.include_traceback = include;
        self
    }

    pub fn default_voice(&self) -> &str {
        &self.default_voice
    }

    pub fn assembler(&self) -> &Arc<AudioAssembler> {
        &self.assembler
    }

    /// Run a job and convert the outcome into a response record.
    pub async fn run(&self, input: JobInput) -> JobResult {
        let request = input.into_request(&self.default_voice);

        match self.execute(&request).await {
            Ok(success) => JobResult::Success(success),
            Err(failed) => {
                let kind = failed.error.kind();
                error!(
                    stage = %failed.stage,
                    kind = %kind,
                    error = %failed.error,
                    user_id = %request.user_id,
                    "Job failed"
                );
                JobResult::Failure(JobFailure {
                    error: failed.error.to_string(),
                    traceback: self.include_traceback.then(|| failed.traceback()),
                    kind,
                })
            }
        }
    }

    pub async fn execute(&self, request: &JobRequest) -> Result<JobSuccess, JobFailed> {
        debug!(stage = %JobStage::Validating, "Job stage");
        if request.text.is_empty() {
            return Err(JobFailed {
                stage: JobStage::Validating,
                error: JobError::MissingText,
            });
        }

        debug!(stage = %JobStage::Synthesizing, voice = %request.voice, speed = request.speed, "Job stage");
        let started = Instant::now();
        let segments = parse(&request.text);
        let audio = self
            .assembler
            .assemble(&segments, &request.voice, request.speed)
            .await
            .map_err(|e| JobFailed::at(JobStage::Synthesizing)(e.into()))?;
        let generation_time = started.elapsed().as_secs_f64();

        debug!(
            stage = %JobStage::Encoding,
            segments = segments.len(),
            samples = audio.sample_count(),
            "Job stage"
        );
        let wav = encode_wav(&audio.samples, audio.sample_rate)
            .map_err(|e| JobFailed::at(JobStage::Encoding)(e.into()))?;

        let key = storage_key(
            &self.key_prefix,
            &request.user_id,
            &request.project_id,
            &request.chapter_id,
        );
        debug!(stage = %JobStage::Uploading, key = %key, bytes = wav.len(), "Job stage");
        let uploader = self.uploader.as_ref().ok_or_else(|| {
            JobFailed::at(JobStage::Uploading)(
                StorageError::NotConfigured("R2 credentials").into(),
            )
        })?;
        let started = Instant::now();
        uploader
            .put(&key, wav, WAV_CONTENT_TYPE)
            .await
            .map_err(|e| JobFailed::at(JobStage::Uploading)(e.into()))?;
        let upload_time = started.elapsed().as_secs_f64();

        let success = JobSuccess {
            success: true,
            audio_url: uploader.public_url(&key),
            duration: round2(audio.duration_seconds()),
            voice: request.voice.clone(),
            text_length: request.text.chars().count(),
            generation_time: round2(generation_time),
            upload_time: round2(upload_time),
            format: "wav",
            sample_rate: audio.sample_rate,
        };

        info!(
            stage = %JobStage::Succeeded,
            key = %key,
            duration = success.duration,
            generation_time = success.generation_time,
            upload_time = success.upload_time,
            "Job completed"
        );

        Ok(success)
    }
}
