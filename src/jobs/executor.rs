//! Process execution for jobs

use crate::jobs::Job;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// What happened to one job attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The process ran to completion
    Exited {
        success: bool,
        /// None when the process was terminated by a signal
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// The process exceeded its time bound and was killed
    TimedOut,
}

/// Runs a job in isolation and reports how it ended
///
/// Errors are reserved for failures to start the job at all (missing
/// interpreter, unreadable script); a job that runs and fails is an
/// `Ok(ExecutionOutcome::Exited { success: false, .. })`.
#[async_trait]
pub trait JobExecutor: Send + Sync {
    async fn execute(&self, job: &Job, timeout: Duration) -> std::io::Result<ExecutionOutcome>;
}

/// Executes job scripts as child processes
///
/// With an interpreter configured the child is `<interpreter> <script>`,
/// otherwise the script itself is executed. The child runs in the job's
/// working directory with stdin closed and output captured.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    interpreter: String,
}

impl ProcessExecutor {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    fn command(&self, job: &Job) -> std::io::Result<Command> {
        // Relative program paths resolve differently across platforms once
        // current_dir is set, so always hand the child an absolute path.
        let script = std::fs::canonicalize(&job.script)?;

        let mut command = if self.interpreter.is_empty() {
            Command::new(script)
        } else {
            let mut command = Command::new(&self.interpreter);
            command.arg(script);
            command
        };

        command
            .current_dir(&job.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        Ok(command)
    }
}

#[async_trait]
impl JobExecutor for ProcessExecutor {
    async fn execute(&self, job: &Job, timeout: Duration) -> std::io::Result<ExecutionOutcome> {
        let child = self.command(job)?.spawn()?;

        // Dropping the wait future on timeout drops the child, which kills it.
        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => {
                let output = output?;
                Ok(ExecutionOutcome::Exited {
                    success: output.status.success(),
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            }
            Err(_) => Ok(ExecutionOutcome::TimedOut),
        }
    }
}
