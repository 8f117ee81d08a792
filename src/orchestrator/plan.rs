//! Dry-run plan

use crate::jobs::Phase;
use std::fmt;

/// One job the orchestrator would consider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedJob {
    pub name: String,
    pub phase: Phase,
    pub script_exists: bool,
    pub completed: bool,
}

impl PlannedJob {
    /// Whether `run_all` would spawn this job
    pub fn would_run(&self) -> bool {
        self.script_exists && !self.completed
    }
}

/// Everything a dry run reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub targets: Vec<String>,
    pub run_phase1: bool,
    pub run_phase2: bool,
    pub resume_capability: bool,
    pub completed: Vec<String>,
    pub jobs: Vec<PlannedJob>,
}

impl fmt::Display for RunPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Speech-Harvest Dry Run ===")?;
        writeln!(f)?;
        writeln!(f, "Targets to scrape ({}): {}", self.targets.len(), self.targets.join(", "))?;
        writeln!(f, "Run phase 1 (links): {}", self.run_phase1)?;
        writeln!(f, "Run phase 2 (texts): {}", self.run_phase2)?;
        writeln!(f, "Resume capability: {}", self.resume_capability)?;

        if !self.completed.is_empty() {
            writeln!(f)?;
            writeln!(f, "Already completed ({}):", self.completed.len())?;
            for job in &self.completed {
                writeln!(f, "  - {}", job)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Jobs:")?;
        for job in &self.jobs {
            let note = match (job.script_exists, job.completed) {
                (false, _) => "script not found",
                (true, true) => "skip (completed)",
                (true, false) => "run",
            };
            writeln!(f, "  [{}] {:<40} {}", job.phase.number(), job.name, note)?;
        }

        let runnable = self.jobs.iter().filter(|j| j.would_run()).count();
        writeln!(f)?;
        write!(f, "Would run {} of {} jobs", runnable, self.jobs.len())
    }
}
