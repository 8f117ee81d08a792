//! Job module: scraping jobs run as isolated subprocesses
//!
//! A job is one phase script for one target. This module provides:
//! - `Job` and `Phase`: naming and locating job scripts
//! - `JobExecutor`: the process-execution seam, with `ProcessExecutor` as
//!   the real implementation
//! - `JobRunner`: skip-if-complete, timeout, bounded retry with backoff

mod executor;
mod runner;

pub use executor::{ExecutionOutcome, JobExecutor, ProcessExecutor};
pub use runner::{truncate_chars, JobOutcome, JobRunner};

use crate::config::{ExecutionConfig, Target};
use std::fmt;
use std::path::PathBuf;

/// The two scrape phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Phase 1: collect listing links
    CollectLinks,

    /// Phase 2: extract full texts
    ExtractTexts,
}

impl Phase {
    pub const ALL: [Phase; 2] = [Phase::CollectLinks, Phase::ExtractTexts];

    /// File name prefix of this phase's job scripts
    pub fn script_prefix(&self) -> &'static str {
        match self {
            Self::CollectLinks => "scrap1",
            Self::ExtractTexts => "scrap2",
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Self::CollectLinks => 1,
            Self::ExtractTexts => 2,
        }
    }

    /// Whether the configuration enables this phase
    pub fn is_enabled(&self, config: &ExecutionConfig) -> bool {
        match self {
            Self::CollectLinks => config.run_phase1,
            Self::ExtractTexts => config.run_phase2,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CollectLinks => write!(f, "Phase 1: Collecting article links"),
            Self::ExtractTexts => write!(f, "Phase 2: Extracting full text content"),
        }
    }
}

/// One phase script for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Job identifier: the script's file name, e.g. `scrap1_Alpha.py`
    pub name: String,

    /// Location of the script on disk
    pub script: PathBuf,

    /// Directory the script runs in
    pub working_dir: PathBuf,

    pub phase: Phase,
    pub target: String,
}

impl Job {
    /// Derives the job for a phase and target from the script layout
    pub fn new(config: &ExecutionConfig, phase: Phase, target: &Target) -> Self {
        let name = if config.script_extension.is_empty() {
            format!("{}_{}", phase.script_prefix(), target.id)
        } else {
            format!(
                "{}_{}.{}",
                phase.script_prefix(),
                target.id,
                config.script_extension
            )
        };

        Self {
            script: config.script_dir.join(&name),
            working_dir: config.script_dir.clone(),
            name,
            phase,
            target: target.id.clone(),
        }
    }

    /// Whether the job's script is present on disk
    pub fn script_exists(&self) -> bool {
        self.script.is_file()
    }
}
