/// Job status definitions for tracking one job through an orchestrator run
///
/// This module defines the states a job moves through and which moves are legal.
use crate::HarvestError;
use std::fmt;

/// Represents the current state of a job in an orchestrator run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    // ===== Active States =====
    /// Job has not been looked at yet
    Pending,

    /// Job subprocess is being executed
    Running,

    // ===== Terminal States =====
    /// Job exited successfully, or was already complete
    Succeeded,

    /// Job attempt failed; terminal once the retry budget is spent
    Failed,
}

impl JobStatus {
    /// Whether moving from `self` to `next` is a legal transition
    ///
    /// | From      | To                   |
    /// |-----------|----------------------|
    /// | Pending   | Running, Succeeded   |
    /// | Running   | Succeeded, Failed    |
    /// | Failed    | Running (retry)      |
    /// | Succeeded | -                    |
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (*self, next),
            (Self::Pending, Self::Running)
                | (Self::Pending, Self::Succeeded)
                | (Self::Running, Self::Succeeded)
                | (Self::Running, Self::Failed)
                | (Self::Failed, Self::Running)
        )
    }

    /// Moves to `next`, rejecting illegal transitions
    pub fn transition(self, next: JobStatus) -> Result<JobStatus, HarvestError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(HarvestError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "success",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
