//! State module for tracking job progress
//!
//! # Components
//!
//! - `JobStatus`: The per-job state machine within one orchestrator run
//! - `JobState`: The durable set of jobs that completed successfully

mod job_state;
mod job_status;

// Re-export main types
pub use job_state::JobState;
pub use job_status::JobStatus;
