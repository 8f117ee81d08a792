//! Collection statistics for the roster
//!
//! This module reports, per target, how far the two phases have progressed
//! based on the collection files and the job state.

use crate::config::{Config, Target};
use crate::jobs::{Job, Phase};
use crate::state::JobState;
use crate::storage::{read_json, LinkRecord, StorageError, TextRecord};
use crate::HarvestError;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;

/// Progress of one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetStatistics {
    pub target: String,

    /// Records in the link collection (0 when absent)
    pub links: usize,

    /// Records in the text collection (0 when absent)
    pub texts: usize,

    /// Links without a matching text record
    pub pending: usize,

    /// Whether each phase's job is recorded as complete
    pub phase1_completed: bool,
    pub phase2_completed: bool,
}

/// Loads statistics for every roster target
pub fn load_statistics(
    config: &Config,
    state: &JobState,
) -> Result<Vec<TargetStatistics>, HarvestError> {
    config
        .roster
        .iter()
        .map(|target| target_statistics(config, state, target))
        .collect()
}

fn target_statistics(
    config: &Config,
    state: &JobState,
    target: &Target,
) -> Result<TargetStatistics, HarvestError> {
    let links: Vec<LinkRecord> = read_records(&config.site.links_path(target))?;
    let texts: Vec<TextRecord> = read_records(&config.site.texts_path(target))?;

    let extracted: HashSet<&str> = texts.iter().map(|t| t.url.as_str()).collect();
    let pending = links
        .iter()
        .filter(|l| !extracted.contains(l.url.as_str()))
        .count();

    let completed = |phase| state.is_completed(&Job::new(&config.execution, phase, target).name);

    Ok(TargetStatistics {
        target: target.id.clone(),
        links: links.len(),
        texts: texts.len(),
        pending,
        phase1_completed: completed(Phase::CollectLinks),
        phase2_completed: completed(Phase::ExtractTexts),
    })
}

/// Reads a collection file; an unparsable file counts as empty, since the
/// next phase run will start it over
fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, HarvestError> {
    match read_json(path) {
        Ok(records) => Ok(records.unwrap_or_default()),
        Err(StorageError::Corrupt { path, source }) => {
            tracing::warn!("Could not read {}: {}", path, source);
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Prints statistics as a table to stdout
pub fn print_statistics(stats: &[TargetStatistics]) {
    println!(
        "{:<20} {:>8} {:>8} {:>8}  {:<6} {:<6}",
        "Target", "Links", "Texts", "Pending", "Phase1", "Phase2"
    );
    println!("{}", "-".repeat(62));

    let mark = |done: bool| if done { "done" } else { "-" };
    for s in stats {
        println!(
            "{:<20} {:>8} {:>8} {:>8}  {:<6} {:<6}",
            s.target,
            s.links,
            s.texts,
            s.pending,
            mark(s.phase1_completed),
            mark(s.phase2_completed)
        );
    }

    let links: usize = stats.iter().map(|s| s.links).sum();
    let texts: usize = stats.iter().map(|s| s.texts).sum();
    println!("{}", "-".repeat(62));
    println!("{:<20} {:>8} {:>8}", "Total", links, texts);
}
