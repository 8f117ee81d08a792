//! Orchestrator module: the state-tracking driver for a full scraping run
//!
//! Phase 1 (link collection) runs for every target before phase 2 (content
//! extraction) starts, since extraction needs the target's links on disk.

mod coordinator;
mod plan;

pub use coordinator::Orchestrator;
pub use plan::{PlannedJob, RunPlan};
