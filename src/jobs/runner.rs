//! Job runner: one job, bounded retries, durable completion

use crate::config::ScrapingConfig;
use crate::jobs::{ExecutionOutcome, Job, JobExecutor};
use crate::state::{JobState, JobStatus};
use crate::HarvestError;
use std::time::{Duration, Instant};

/// Characters of job output kept in a failure record
const ERROR_TEXT_LIMIT: usize = 500;

/// Final result of running one job
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// Already complete in the job state; nothing was spawned
    Skipped,

    /// Exited successfully
    Succeeded {
        /// Wall-clock seconds of the successful attempt
        duration: f64,
        attempts: u32,
    },

    /// Every allowed attempt failed, timed out, or could not start
    Failed {
        error: String,
        exit_code: Option<i32>,
        attempts: u32,
    },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, JobOutcome::Failed { .. })
    }
}

/// Runs jobs through a [`JobExecutor`] with the configured retry policy
pub struct JobRunner<E> {
    executor: E,
    max_retries: u32,
    backoff: Duration,
    timeout: Duration,
}

impl<E: JobExecutor> JobRunner<E> {
    pub fn new(executor: E, config: &ScrapingConfig) -> Self {
        Self {
            executor,
            max_retries: config.effective_max_retries(),
            backoff: Duration::from_secs(config.retry_backoff_secs),
            timeout: Duration::from_secs(config.job_timeout_secs),
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Runs a job unless it is already complete
    ///
    /// On success the job is added to `state`, which is persisted at once.
    /// Nothing inside a job attempt escapes as an error: spawn failures and
    /// internal faults become a `Failed` outcome.
    pub async fn run(&self, job: &Job, state: &mut JobState) -> JobOutcome {
        if state.is_completed(&job.name) {
            tracing::info!("Skipping {} (already completed)", job.name);
            return JobOutcome::Skipped;
        }

        match self.run_attempts(job, state).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Unexpected error running {}: {}", job.name, e);
                JobOutcome::Failed {
                    error: e.to_string(),
                    exit_code: None,
                    attempts: 1,
                }
            }
        }
    }

    async fn run_attempts(
        &self,
        job: &Job,
        state: &mut JobState,
    ) -> Result<JobOutcome, HarvestError> {
        let mut status = JobStatus::Pending;
        let mut retries = 0;

        loop {
            status = status.transition(JobStatus::Running)?;
            let attempts = retries + 1;
            tracing::info!("Running {}...", job.name);
            let started = Instant::now();

            let outcome = match self.executor.execute(job, self.timeout).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    status.transition(JobStatus::Failed)?;
                    tracing::error!("Unexpected error running {}: {}", job.name, e);
                    return Ok(JobOutcome::Failed {
                        error: e.to_string(),
                        exit_code: None,
                        attempts,
                    });
                }
            };

            match outcome {
                ExecutionOutcome::Exited { success: true, .. } => {
                    status.transition(JobStatus::Succeeded)?;
                    let duration = started.elapsed().as_secs_f64();
                    tracing::info!("{} completed successfully in {:.2}s", job.name, duration);

                    if let Err(e) = state.mark_completed(&job.name) {
                        tracing::error!("Failed to persist job state after {}: {}", job.name, e);
                    }

                    return Ok(JobOutcome::Succeeded { duration, attempts });
                }

                ExecutionOutcome::Exited {
                    success: false,
                    code,
                    stdout,
                    stderr,
                } => {
                    status = status.transition(JobStatus::Failed)?;
                    let output = if stderr.is_empty() { stdout } else { stderr };
                    let error = truncate_chars(&output, ERROR_TEXT_LIMIT);

                    match code {
                        Some(code) => {
                            tracing::error!("{} failed with exit code {}", job.name, code)
                        }
                        None => tracing::error!("{} was terminated by a signal", job.name),
                    }
                    tracing::error!("Error output: {}", error);

                    if retries < self.max_retries {
                        retries += 1;
                        tracing::info!(
                            "Retrying {} (attempt {}/{})",
                            job.name,
                            retries,
                            self.max_retries
                        );
                        tokio::time::sleep(self.backoff).await;
                        continue;
                    }

                    return Ok(JobOutcome::Failed {
                        error,
                        exit_code: code,
                        attempts,
                    });
                }

                ExecutionOutcome::TimedOut => {
                    status.transition(JobStatus::Failed)?;
                    tracing::error!("{} timed out", job.name);
                    return Ok(JobOutcome::Failed {
                        error: format!("Timeout after {} seconds", self.timeout.as_secs()),
                        exit_code: None,
                        attempts,
                    });
                }
            }
        }
    }
}

/// Keeps at most `limit` characters of `text`
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
