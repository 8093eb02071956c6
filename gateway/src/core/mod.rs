pub mod audio;
pub mod job;
pub mod markers;
pub mod storage;
pub mod tts;

// Re-export commonly used types for convenience
pub use audio::{AssembledAudio, AudioAssembler, KOKORO_SAMPLE_RATE, SampleBuffer, encode_wav, silence};

pub use job::{
    JobFailed, JobFailure, JobInput, JobOrchestrator, JobPayload, JobRequest, JobResult, JobStage,
    JobSuccess, storage_key,
};

pub use markers::{MAX_PAUSE_SECONDS, ParsedInput, Segment, parse};

pub use storage::{AudioUploader, ObjectStoreUploader, R2Settings, StorageError, StorageResult};

pub use tts::{
    KokoroTTS, KokoroTTSConfig, SegmentSynthesizer, TTSError, TTSResult, TtsEngine, VoiceCache,
    VoicePack, create_tts_engine,
};
