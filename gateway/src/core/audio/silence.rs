use super::SampleBuffer;

/// Build a buffer of exactly `round(duration_seconds * sample_rate)` zero samples.
pub fn silence(duration_seconds: f64, sample_rate: u32) -> SampleBuffer {
    let count = (duration_seconds * sample_rate as f64).round().max(0.0) as usize;
    SampleBuffer::new(vec![0.0; count], sample_rate)
}
