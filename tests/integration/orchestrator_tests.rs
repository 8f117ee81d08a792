//! Orchestrator runs with real `sh` job scripts

use speech_harvest::config::Target;
use speech_harvest::{Config, JobState, Orchestrator, RunSummary};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn scripts(&self) -> PathBuf {
        self.path().join("scripts")
    }

    fn summaries(&self) -> PathBuf {
        self.path().join("summaries")
    }

    fn state_file(&self) -> PathBuf {
        self.path().join(".scraping_state.json")
    }

    fn config(&self, targets: &[&str]) -> Config {
        let mut config = Config::default();
        config.roster = targets.iter().map(|id| Target::new(*id)).collect();
        config.scraping.delay_between_scripts = 0;
        config.scraping.retry_backoff_secs = 0;
        config.scraping.job_timeout_secs = 30;
        config.execution.script_dir = self.scripts();
        config.execution.state_file = self.state_file();
        config.execution.summary_dir = self.summaries();
        config.execution.interpreter = "sh".to_string();
        config
    }

    /// Writes a job script that records its run in a marker file
    fn script(&self, name: &str, body: &str) {
        std::fs::create_dir_all(self.scripts()).unwrap();
        let marker = self.marker(name);
        let content = format!("echo run >> '{}'\n{}\n", marker.display(), body);
        std::fs::write(self.scripts().join(name), content).unwrap();
    }

    fn marker(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}.runs", name))
    }

    fn runs(&self, name: &str) -> usize {
        std::fs::read_to_string(self.marker(name))
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }

    fn summary_files(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(self.summaries()) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn completed(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.state_file()).unwrap();
        serde_json::from_str(&content).unwrap()
    }
}

#[tokio::test]
async fn test_runs_both_phases_and_records_completion() {
    let ws = Workspace::new();
    ws.script("scrap1_Alpha.py", "exit 0");
    ws.script("scrap2_Alpha.py", "exit 0");

    let mut orchestrator = Orchestrator::new(ws.config(&["Alpha"])).unwrap();
    let summary = orchestrator.run_all().await.unwrap();

    assert_eq!(
        ws.completed(),
        serde_json::json!({"completed": ["scrap1_Alpha.py", "scrap2_Alpha.py"]})
    );
    assert_eq!(summary.scripts_executed.len(), 2);
    assert_eq!(summary.scripts_executed[0].script, "scrap1_Alpha.py");
    assert_eq!(summary.scripts_executed[1].script, "scrap2_Alpha.py");
    assert!(summary.scripts_failed.is_empty());
    assert_eq!(summary.exit_code(), 0);

    let files = ws.summary_files();
    assert_eq!(files.len(), 1);
    let saved: RunSummary =
        serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
    assert_eq!(saved.scripts_executed.len(), 2);
    assert!(saved.end_time.is_some());
}

#[tokio::test]
async fn test_completed_jobs_are_skipped() {
    let ws = Workspace::new();
    ws.script("scrap1_Alpha.py", "exit 0");
    ws.script("scrap2_Alpha.py", "exit 0");
    std::fs::write(ws.state_file(), r#"{"completed": ["scrap1_Alpha.py"]}"#).unwrap();

    let mut orchestrator = Orchestrator::new(ws.config(&["Alpha"])).unwrap();
    let summary = orchestrator.run_all().await.unwrap();

    assert_eq!(ws.runs("scrap1_Alpha.py"), 0);
    assert_eq!(ws.runs("scrap2_Alpha.py"), 1);
    assert_eq!(summary.scripts_skipped, vec!["scrap1_Alpha.py"]);
    assert_eq!(summary.scripts_executed.len(), 1);

    // A second run skips everything
    let mut orchestrator = Orchestrator::new(ws.config(&["Alpha"])).unwrap();
    let summary = orchestrator.run_all().await.unwrap();
    assert_eq!(summary.scripts_skipped.len(), 2);
    assert!(summary.scripts_executed.is_empty());
    assert_eq!(ws.runs("scrap2_Alpha.py"), 1);
}

#[tokio::test]
async fn test_failing_job_is_retried_then_recorded() {
    let ws = Workspace::new();
    ws.script("scrap1_Alpha.py", "echo 'listing exploded' >&2\nexit 3");
    ws.script("scrap1_Beta.py", "exit 0");

    let mut config = ws.config(&["Alpha", "Beta"]);
    config.scraping.max_retries = 2;
    let mut orchestrator = Orchestrator::new(config).unwrap();
    let summary = orchestrator.run_all().await.unwrap();

    assert_eq!(ws.runs("scrap1_Alpha.py"), 3);
    assert_eq!(ws.runs("scrap1_Beta.py"), 1);

    assert_eq!(summary.scripts_failed.len(), 1);
    let failed = &summary.scripts_failed[0];
    assert_eq!(failed.script, "scrap1_Alpha.py");
    assert_eq!(failed.exit_code, Some(3));
    assert!(failed.error.contains("listing exploded"));
    assert_eq!(summary.exit_code(), 1);

    assert_eq!(
        ws.completed(),
        serde_json::json!({"completed": ["scrap1_Beta.py"]})
    );
}

#[tokio::test]
async fn test_retry_disabled_runs_once() {
    let ws = Workspace::new();
    ws.script("scrap1_Alpha.py", "exit 1");

    let mut config = ws.config(&["Alpha"]);
    config.scraping.retry_on_failure = false;
    let mut orchestrator = Orchestrator::new(config).unwrap();
    let summary = orchestrator.run_all().await.unwrap();

    assert_eq!(ws.runs("scrap1_Alpha.py"), 1);
    assert_eq!(summary.exit_code(), 1);
}

#[tokio::test]
async fn test_missing_scripts_are_not_failures() {
    let ws = Workspace::new();
    ws.script("scrap1_Alpha.py", "exit 0");

    let mut orchestrator = Orchestrator::new(ws.config(&["Alpha", "Beta"])).unwrap();
    let summary = orchestrator.run_all().await.unwrap();

    assert_eq!(summary.scripts_executed.len(), 1);
    assert!(summary.scripts_failed.is_empty());
    assert!(summary.scripts_skipped.is_empty());
    assert_eq!(summary.exit_code(), 0);
}

#[tokio::test]
async fn test_disabled_phase_is_not_run() {
    let ws = Workspace::new();
    ws.script("scrap1_Alpha.py", "exit 0");
    ws.script("scrap2_Alpha.py", "exit 0");

    let mut config = ws.config(&["Alpha"]);
    config.execution.run_phase1 = false;
    let mut orchestrator = Orchestrator::new(config).unwrap();
    orchestrator.run_all().await.unwrap();

    assert_eq!(ws.runs("scrap1_Alpha.py"), 0);
    assert_eq!(ws.runs("scrap2_Alpha.py"), 1);
}

#[tokio::test]
async fn test_reset_reruns_completed_jobs() {
    let ws = Workspace::new();
    ws.script("scrap1_Alpha.py", "exit 0");
    std::fs::write(ws.state_file(), r#"{"completed": ["scrap1_Alpha.py"]}"#).unwrap();

    let mut orchestrator = Orchestrator::new(ws.config(&["Alpha"])).unwrap();
    orchestrator.reset().unwrap();
    assert!(orchestrator.state().completed().is_empty());

    orchestrator.run_all().await.unwrap();
    assert_eq!(ws.runs("scrap1_Alpha.py"), 1);
    assert_eq!(
        JobState::load(ws.state_file()).unwrap().completed().to_vec(),
        vec!["scrap1_Alpha.py"]
    );
}

#[tokio::test]
async fn test_without_resume_state_is_never_written() {
    let ws = Workspace::new();
    ws.script("scrap1_Alpha.py", "exit 0");
    std::fs::write(ws.state_file(), r#"{"completed": ["scrap1_Alpha.py"]}"#).unwrap();

    let mut config = ws.config(&["Alpha"]);
    config.execution.resume_capability = false;
    let mut orchestrator = Orchestrator::new(config).unwrap();
    orchestrator.run_all().await.unwrap();

    assert_eq!(ws.runs("scrap1_Alpha.py"), 1);
    assert_eq!(
        ws.completed(),
        serde_json::json!({"completed": ["scrap1_Alpha.py"]})
    );
}

#[tokio::test]
async fn test_dry_run_has_no_side_effects() {
    let ws = Workspace::new();
    ws.script("scrap1_Alpha.py", "exit 0");
    ws.script("scrap2_Alpha.py", "exit 0");
    std::fs::write(ws.state_file(), r#"{"completed": ["scrap1_Alpha.py"]}"#).unwrap();

    let orchestrator = Orchestrator::new(ws.config(&["Alpha", "Beta"])).unwrap();
    let plan = orchestrator.plan();

    assert_eq!(plan.jobs.len(), 4);
    let alpha1 = &plan.jobs[0];
    assert_eq!(alpha1.name, "scrap1_Alpha.py");
    assert!(alpha1.script_exists && alpha1.completed && !alpha1.would_run());
    assert!(!plan.jobs[1].script_exists);
    assert!(plan.jobs[2].would_run());

    let report = plan.to_string();
    assert!(report.contains("scrap2_Alpha.py"));
    assert!(report.contains("Would run 1 of 4 jobs"));

    assert_eq!(ws.runs("scrap1_Alpha.py"), 0);
    assert_eq!(ws.runs("scrap2_Alpha.py"), 0);
    assert!(ws.summary_files().is_empty());
    assert_eq!(
        ws.completed(),
        serde_json::json!({"completed": ["scrap1_Alpha.py"]})
    );
}
