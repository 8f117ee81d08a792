//! Durable set of completed jobs
//!
//! Stored as `{"completed": [...]}`. Entries keep their completion order.

use crate::storage::{read_json, write_json_atomic, StorageResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct JobStateFile {
    #[serde(default)]
    completed: Vec<String>,
}

/// Completed-jobs set, optionally backed by a state file
#[derive(Debug)]
pub struct JobState {
    path: Option<PathBuf>,
    completed: Vec<String>,
}

impl JobState {
    /// Loads the state file, or starts empty if it does not exist
    pub fn load(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let file: JobStateFile = read_json(&path)?.unwrap_or_default();

        let mut state = Self {
            path: Some(path),
            completed: Vec::new(),
        };
        for job in file.completed {
            if !state.is_completed(&job) {
                state.completed.push(job);
            }
        }

        Ok(state)
    }

    /// A state that is never read from or written to disk
    ///
    /// Used when resume support is switched off.
    pub fn ephemeral() -> Self {
        Self {
            path: None,
            completed: Vec::new(),
        }
    }

    pub fn is_completed(&self, job: &str) -> bool {
        self.completed.iter().any(|j| j == job)
    }

    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Records a job as complete and persists immediately
    pub fn mark_completed(&mut self, job: &str) -> StorageResult<()> {
        if !self.is_completed(job) {
            self.completed.push(job.to_string());
        }
        self.save()
    }

    /// Forgets every completed job and persists the empty set
    pub fn reset(&mut self) -> StorageResult<()> {
        self.completed.clear();
        self.save()
    }

    fn save(&self) -> StorageResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        write_json_atomic(
            path,
            &JobStateFile {
                completed: self.completed.clone(),
            },
        )
    }
}
