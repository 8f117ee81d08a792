//! Speech-Harvest: a resumable scraper pipeline for presidential speech archives
//!
//! This crate collects speech links and texts from a paginated web archive in two
//! phases, and drives per-target scraping jobs as subprocesses with durable
//! completion state, bounded retries and a run summary.

pub mod config;
pub mod crawler;
pub mod jobs;
pub mod logging;
pub mod orchestrator;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Speech-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Link collection not found: {path}. Run the link collection phase first.")]
    MissingLinks { path: String },

    #[error("Every listing request for {target} failed ({pages} pages)")]
    ArchiveUnreachable { target: String, pages: u32 },

    #[error("Unknown target: {0}")]
    UnknownTarget(String),

    #[error("Invalid job transition: {from} -> {to}")]
    InvalidTransition {
        from: state::JobStatus,
        to: state::JobStatus,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid target identifier: {0}")]
    InvalidTarget(String),
}

// Re-export commonly used types
pub use config::{Config, Target};
pub use orchestrator::Orchestrator;
pub use output::RunSummary;
pub use state::{JobState, JobStatus};
pub use storage::{LinkRecord, TextRecord};
