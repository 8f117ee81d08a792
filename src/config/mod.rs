//! Configuration module for Speech-Harvest
//!
//! This module handles loading, parsing, and validating the JSON (or TOML)
//! configuration document.
//!
//! # Example
//!
//! ```no_run
//! use speech_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.json")).unwrap();
//! println!("Max retries: {}", config.scraping.max_retries);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ExecutionConfig, ScrapingConfig, SiteConfig, Target};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_or_default, load_config_with_hash};
