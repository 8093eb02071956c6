//! Job handling: request/response records, storage keys and the
//! stage-by-stage orchestrator.

mod key;
mod orchestrator;
mod types;

pub use key::{DEFAULT_KEY_PREFIX, storage_key};
pub use orchestrator::{JobFailed, JobOrchestrator, JobStage};
pub use types::{JobFailure, JobInput, JobPayload, JobRequest, JobResult, JobSuccess};
