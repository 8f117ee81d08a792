//! Append-only keyed collections backed by a JSON array file

use crate::storage::json::{read_json, write_json_atomic};
use crate::storage::{Keyed, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// An ordered, deduplicated list of records persisted as one JSON array
///
/// Loaded records keep their order; new records are appended after them.
/// Each save rewrites the whole file.
#[derive(Debug)]
pub struct Collection<T> {
    path: PathBuf,
    records: Vec<T>,
    keys: HashSet<String>,
    saved_len: usize,
}

impl<T> Collection<T>
where
    T: Keyed + Serialize + DeserializeOwned,
{
    /// Creates an empty collection bound to `path` without touching the disk
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
            keys: HashSet::new(),
            saved_len: 0,
        }
    }

    /// Opens the collection at `path`, loading existing records if the file exists
    ///
    /// Duplicate keys in the file are collapsed to their first occurrence.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let mut collection = Self::empty(path);
        let loaded: Vec<T> = read_json(&collection.path)?.unwrap_or_default();

        for record in loaded {
            collection.insert(record);
        }
        collection.saved_len = collection.records.len();

        Ok(collection)
    }

    /// Appends a record unless its key is already present
    ///
    /// Returns true if the record was added. Records with an empty key (legacy
    /// files written without one) are kept but never indexed.
    pub fn insert(&mut self, record: T) -> bool {
        if record.key().is_empty() {
            self.records.push(record);
            return true;
        }
        if self.keys.contains(record.key()) {
            return false;
        }
        self.keys.insert(record.key().to_string());
        self.records.push(record);
        true
    }

    /// Whether a record with this key exists
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrites the whole file with the current records
    pub fn save(&mut self) -> StorageResult<()> {
        write_json_atomic(&self.path, &self.records)?;
        self.saved_len = self.records.len();
        Ok(())
    }

    /// Saves if the size sits on a multiple of `interval` that has not been
    /// written yet
    ///
    /// Returns true if a checkpoint was written.
    pub fn checkpoint(&mut self, interval: usize) -> StorageResult<bool> {
        let len = self.records.len();
        if interval == 0 || len == 0 || len % interval != 0 || len == self.saved_len {
            return Ok(false);
        }
        self.save()?;
        tracing::info!("Saved {} records to {}", len, self.path.display());
        Ok(true)
    }
}
