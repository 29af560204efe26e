//! Record repository
//!
//! Loading of the movie collection from its backing store.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::Record;

/// Top-level key holding the record array in the backing document.
pub const MOVIES_KEY: &str = "movies";

/// Source of the full record collection.
///
/// Implementations never fail: an unreadable store is reported through
/// logging and behaves like an empty one.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Load every record, in store order
    async fn load(&self) -> Vec<Record>;
}

/// Store backed by a JSON document on disk, re-read on every load.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load(&self) -> Vec<Record> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) => {
                tracing::error!(path = %self.path.display(), "Error loading movie store: {}", e);
                return Vec::new();
            }
        };

        match parse_document(&contents) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(path = %self.path.display(), "Error parsing movie store: {}", e);
                Vec::new()
            }
        }
    }
}

/// Parse a backing document into records.
///
/// Elements missing a required field are skipped rather than failing the
/// whole document.
pub fn parse_document(contents: &str) -> Result<Vec<Record>, serde_json::Error> {
    let mut document: Value = serde_json::from_str(contents)?;

    let entries = match document.get_mut(MOVIES_KEY).map(Value::take) {
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            tracing::warn!("`{}` is not an array, treating store as empty", MOVIES_KEY);
            return Ok(Vec::new());
        }
        None => {
            tracing::warn!("Document has no `{}` key, treating store as empty", MOVIES_KEY);
            return Ok(Vec::new());
        }
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Record>(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(index, "Skipping malformed movie entry: {}", e);
                None
            }
        })
        .collect())
}

/// In-memory store for testing and development
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<Record>>,
}

impl InMemoryStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Replace the stored records
    pub fn replace(&self, records: Vec<Record>) {
        match self.records.write() {
            Ok(mut guard) => *guard = records,
            Err(poisoned) => *poisoned.into_inner() = records,
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn load(&self) -> Vec<Record> {
        match self.records.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
