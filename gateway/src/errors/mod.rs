pub mod job_error;

pub use job_error::{JobError, JobErrorKind, error_chain};
