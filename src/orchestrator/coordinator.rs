//! Orchestrator - runs every phase job for every target
//!
//! This module contains the driver loop that:
//! - Loads or resets the completed-jobs state
//! - Walks phases in order, and targets in roster order within a phase
//! - Delegates each job to the job runner
//! - Paces jobs and writes the run summary

use crate::config::Config;
use crate::jobs::{Job, JobExecutor, JobOutcome, JobRunner, Phase, ProcessExecutor};
use crate::orchestrator::plan::{PlannedJob, RunPlan};
use crate::output::RunSummary;
use crate::state::JobState;
use crate::HarvestError;
use std::time::Duration;

/// Top-level driver for a scraping run
pub struct Orchestrator<E = ProcessExecutor> {
    config: Config,
    state: JobState,
    runner: JobRunner<E>,
}

impl Orchestrator<ProcessExecutor> {
    /// Creates an orchestrator that runs job scripts as child processes
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let executor = ProcessExecutor::new(config.execution.interpreter.clone());
        Self::with_executor(config, executor)
    }
}

impl<E: JobExecutor> Orchestrator<E> {
    /// Creates an orchestrator with a custom job executor
    ///
    /// The job state is loaded from the state file when resume support is
    /// enabled; otherwise it starts empty and is never written.
    pub fn with_executor(config: Config, executor: E) -> Result<Self, HarvestError> {
        let state = if config.execution.resume_capability {
            JobState::load(&config.execution.state_file)?
        } else {
            JobState::ephemeral()
        };
        let runner = JobRunner::new(executor, &config.scraping);

        Ok(Self {
            config,
            state,
            runner,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    /// Clears the completed-jobs state so every job runs again
    pub fn reset(&mut self) -> Result<(), HarvestError> {
        tracing::info!("Resetting state...");
        self.state.reset()?;
        Ok(())
    }

    /// Describes what `run_all` would do, without running or changing anything
    pub fn plan(&self) -> RunPlan {
        let execution = &self.config.execution;
        let mut jobs = Vec::new();

        for phase in Phase::ALL {
            if !phase.is_enabled(execution) {
                continue;
            }
            for target in &self.config.roster {
                let job = Job::new(execution, phase, target);
                jobs.push(PlannedJob {
                    script_exists: job.script_exists(),
                    completed: self.state.is_completed(&job.name),
                    name: job.name,
                    phase,
                });
            }
        }

        RunPlan {
            targets: self.config.roster.iter().map(|t| t.id.clone()).collect(),
            run_phase1: execution.run_phase1,
            run_phase2: execution.run_phase2,
            resume_capability: execution.resume_capability,
            completed: self.state.completed().to_vec(),
            jobs,
        }
    }

    /// Runs all enabled phases for all targets and saves the run summary
    ///
    /// Job failures are recorded in the summary and never abort the run.
    /// The only errors returned are failures to write the summary itself.
    pub async fn run_all(&mut self) -> Result<RunSummary, HarvestError> {
        let mut summary = RunSummary::start();
        let delay = Duration::from_secs(self.config.scraping.delay_between_scripts);

        tracing::info!("{}", "=".repeat(60));
        tracing::info!("Starting Presidential Speeches Scraping Pipeline");
        tracing::info!("{}", "=".repeat(60));

        for phase in Phase::ALL {
            if !phase.is_enabled(&self.config.execution) {
                tracing::info!("Phase {} disabled, skipping", phase.number());
                continue;
            }

            tracing::info!("{}", phase);
            tracing::info!("{}", "-".repeat(60));

            for target in &self.config.roster {
                let job = Job::new(&self.config.execution, phase, target);
                if !job.script_exists() {
                    tracing::warn!("Script {} not found", job.script.display());
                    continue;
                }

                match self.runner.run(&job, &mut self.state).await {
                    JobOutcome::Skipped => {
                        summary.record_skipped(&job.name);
                        continue;
                    }
                    JobOutcome::Succeeded { duration, .. } => {
                        summary.record_executed(&job.name, duration);
                    }
                    JobOutcome::Failed {
                        error, exit_code, ..
                    } => {
                        summary.record_failed(&job.name, &error, exit_code);
                    }
                }

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        summary.finish();
        summary.log_report();

        let path = summary.save(&self.config.execution.summary_dir)?;
        tracing::info!("Summary saved to {}", path.display());
        tracing::info!("{}", "=".repeat(60));

        Ok(summary)
    }
}
