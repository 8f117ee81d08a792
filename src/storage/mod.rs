//! Storage module for persisting scrape results
//!
//! This module handles all file persistence for the pipeline, including:
//! - Link and text record types
//! - Keyed, append-only collections with checkpointing
//! - Crash-safe whole-file JSON writes

mod collection;
mod json;
mod traits;

pub use collection::Collection;
pub use json::{read_json, write_json_atomic};
pub use traits::{Keyed, StorageError, StorageResult};

use serde::{Deserialize, Serialize};

/// A discovered listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub title: String,
    pub url: String,
}

impl Keyed for LinkRecord {
    fn key(&self) -> &str {
        &self.url
    }
}

/// A fully extracted document
///
/// `paragraphs` is never empty for a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    #[serde(default)]
    pub url: String,
    pub title: String,
    /// Empty when the page carries no recognizable date
    #[serde(default)]
    pub date: String,
    pub paragraphs: Vec<String>,
}

impl Keyed for TextRecord {
    fn key(&self) -> &str {
        &self.url
    }
}

/// Collection of discovered links for one target
pub type LinkCollection = Collection<LinkRecord>;

/// Collection of extracted texts for one target
pub type TextCollection = Collection<TextRecord>;
