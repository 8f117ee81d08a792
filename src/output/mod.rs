//! Output module for run summaries and progress statistics
//!
//! - `summary`: the per-invocation RunSummary written at the end of a run
//! - `stats`: per-target collection statistics for `--status`

mod stats;
mod summary;

pub use stats::{load_statistics, print_statistics, TargetStatistics};
pub use summary::{ExecutedJob, FailedJob, RunSummary};
