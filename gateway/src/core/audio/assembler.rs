//! Pause-aware audio assembly.
//!
//! Walks the parsed segments in order, synthesizing speech and generating
//! silence, and joins everything into one waveform.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::{AssembledAudio, SampleBuffer, silence};
use crate::core::markers::{ParsedInput, Segment};
use crate::core::tts::{SegmentSynthesizer, TTSError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AssemblyError {
    /// Every segment contributed nothing
    #[error("No audio generated")]
    NoAudioGenerated,
    #[error(transparent)]
    Synthesis(#[from] TTSError),
}

pub struct AudioAssembler {
    synthesizer: Arc<SegmentSynthesizer>,
    sample_rate: u32,
}

impl AudioAssembler {
    pub fn new(synthesizer: Arc<SegmentSynthesizer>, sample_rate: u32) -> Self {
        Self {
            synthesizer,
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn synthesizer(&self) -> &Arc<SegmentSynthesizer> {
        &self.synthesizer
    }

    /// Render `segments` in order into one waveform.
    ///
    /// Segments are processed strictly one after another. Speech that renders
    /// to nothing is skipped; a job whose total is zero samples fails with
    /// [`AssemblyError::NoAudioGenerated`].
    pub async fn assemble(
        &self,
        segments: &ParsedInput,
        voice: &str,
        speed: f32,
    ) -> Result<AssembledAudio, AssemblyError> {
        let mut buffers: Vec<SampleBuffer> = Vec::with_capacity(segments.len());

        for (index, segment) in segments.iter().enumerate() {
            match segment {
                Segment::Pause { duration_seconds } => {
                    buffers.push(silence(*duration_seconds, self.sample_rate));
                }
                Segment::Speech { text } => {
                    let text = text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    let buffer = self.synthesizer.synthesize(text, voice, speed).await?;
                    if buffer.is_empty() {
                        debug!(index, "Speech segment produced no audio, skipping");
                        continue;
                    }
                    if buffer.sample_rate != self.sample_rate {
                        return Err(TTSError::InvalidConfiguration(format!(
                            "engine produced {} Hz audio, expected {} Hz",
                            buffer.sample_rate, self.sample_rate
                        ))
                        .into());
                    }
                    buffers.push(buffer);
                }
            }
        }

        let total: usize = buffers.iter().map(SampleBuffer::len).sum();
        if total == 0 {
            return Err(AssemblyError::NoAudioGenerated);
        }

        let mut samples = Vec::with_capacity(total);
        for buffer in buffers {
            samples.extend(buffer.samples);
        }

        Ok(AssembledAudio {
            samples,
            sample_rate: self.sample_rate,
        })
    }
}
