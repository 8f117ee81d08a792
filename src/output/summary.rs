//! Run summary for one orchestrator invocation

use crate::jobs::truncate_chars;
use crate::state::JobStatus;
use crate::storage::{write_json_atomic, StorageResult};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A job that ran to a successful exit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutedJob {
    pub script: String,
    pub status: String,
    /// Seconds
    pub execution_time: f64,
}

/// A job that failed after exhausting its retries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedJob {
    pub script: String,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

/// Record of one orchestrator invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub start_time: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Local>>,
    pub scripts_executed: Vec<ExecutedJob>,
    pub scripts_failed: Vec<FailedJob>,
    pub scripts_skipped: Vec<String>,
}

impl RunSummary {
    /// Starts a summary stamped with the current time
    pub fn start() -> Self {
        Self {
            start_time: Local::now(),
            end_time: None,
            scripts_executed: Vec::new(),
            scripts_failed: Vec::new(),
            scripts_skipped: Vec::new(),
        }
    }

    pub fn record_executed(&mut self, script: &str, execution_time: f64) {
        self.scripts_executed.push(ExecutedJob {
            script: script.to_string(),
            status: JobStatus::Succeeded.to_string(),
            execution_time,
        });
    }

    pub fn record_failed(&mut self, script: &str, error: &str, exit_code: Option<i32>) {
        self.scripts_failed.push(FailedJob {
            script: script.to_string(),
            error: error.to_string(),
            exit_code,
        });
    }

    pub fn record_skipped(&mut self, script: &str) {
        self.scripts_skipped.push(script.to_string());
    }

    /// Stamps the end time
    pub fn finish(&mut self) {
        self.end_time = Some(Local::now());
    }

    /// True when no job failed
    pub fn is_success(&self) -> bool {
        self.scripts_failed.is_empty()
    }

    /// Process exit code for this run: 0 iff no job failed
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// File name used when saving, derived from the end (or start) time
    pub fn file_name(&self) -> String {
        let stamp = self.end_time.unwrap_or(self.start_time);
        format!("scraping_summary_{}.json", stamp.format("%Y%m%d_%H%M%S"))
    }

    /// Writes the summary into `dir` and returns the file path
    pub fn save(&self, dir: &Path) -> StorageResult<PathBuf> {
        let path = dir.join(self.file_name());
        write_json_atomic(&path, self)?;
        Ok(path)
    }

    /// Logs the human-readable summary
    pub fn log_report(&self) {
        tracing::info!("{}", "=".repeat(60));
        tracing::info!("EXECUTION SUMMARY");
        tracing::info!("{}", "=".repeat(60));
        tracing::info!("Successfully executed: {}", self.scripts_executed.len());
        tracing::info!("Failed: {}", self.scripts_failed.len());
        tracing::info!("Skipped: {}", self.scripts_skipped.len());

        if !self.scripts_failed.is_empty() {
            tracing::info!("Failed scripts:");
            for failed in &self.scripts_failed {
                tracing::info!("  - {}: {}", failed.script, truncate_chars(&failed.error, 100));
            }
        }
    }
}
