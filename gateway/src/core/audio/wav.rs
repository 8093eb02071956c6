//! WAV container encoding.
//!
//! Audio is written as mono 16-bit PCM, which is what the browser players in
//! front of the bucket expect.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

/// Content type stored alongside uploaded objects.
pub const WAV_CONTENT_TYPE: &str = "audio/wav";

/// Size of the canonical RIFF/WAVE header written by `hound` for PCM.
pub const WAV_HEADER_LEN: usize = 44;

fn to_pcm16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Serialize `samples` at `sample_rate` into an in-memory WAV file.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut buffer = Vec::with_capacity(WAV_HEADER_LEN + samples.len() * 2);
    {
        let mut writer = WavWriter::new(Cursor::new(&mut buffer), spec)?;
        for &sample in samples {
            writer.write_sample(to_pcm16(sample))?;
        }
        writer.finalize()?;
    }

    Ok(buffer)
}
