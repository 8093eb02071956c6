//! Audio buffers and the pause-aware assembly pipeline.
//!
//! - `silence` - exact-length zero buffers for pause segments
//! - `assembler` - drives synthesis per segment and joins the results
//! - `wav` - mono 16-bit WAV encoding of the assembled waveform

pub mod assembler;
pub mod silence;
pub mod wav;

pub use assembler::AudioAssembler;
pub use silence::silence;
pub use wav::{WAV_CONTENT_TYPE, encode_wav};

/// Sample rate produced by the Kokoro engine (Hz).
pub const KOKORO_SAMPLE_RATE: u32 = 24_000;

/// Mono floating-point samples at a fixed sample rate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// The final waveform of a job, ready for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AssembledAudio {
    /// Duration in seconds: `sample_count / sample_rate`.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}
