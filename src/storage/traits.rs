//! Storage traits and error types
//!
//! This module defines the keyed-record interface used by collection files
//! and the associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Corrupt collection file {path}: {source}")]
    Corrupt {
        path: String,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: String,
        source: tempfile::PersistError,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A record that is unique within its collection by a string key
///
/// Keys are compared as exact strings; no normalization is applied.
pub trait Keyed {
    /// The record's unique key
    fn key(&self) -> &str;
}
