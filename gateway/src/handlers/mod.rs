//! HTTP request handlers
//!
//! - `api` - Health check endpoint
//! - `job` - Synchronous job execution

pub mod api;
pub mod job;

pub use job::run_job;
