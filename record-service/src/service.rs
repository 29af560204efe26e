//! Record lookup service
//!
//! Business logic shared by the gRPC and HTTP listeners.

use std::sync::Arc;

use crate::models::Record;
use crate::repository::RecordStore;

/// First record, in store order, whose identifier matches `id` as text.
pub fn lookup<'a>(records: &'a [Record], id: &str) -> Option<&'a Record> {
    records.iter().find(|record| record.normalized_id() == id)
}

/// Read-only view over a record store.
///
/// Every call reloads the store, so results always reflect the current
/// backing state.
#[derive(Clone)]
pub struct RecordCatalog {
    store: Arc<dyn RecordStore>,
}

impl RecordCatalog {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// All records currently in the store
    pub async fn list(&self) -> Vec<Record> {
        self.store.load().await
    }

    /// Find a record by identifier
    pub async fn find(&self, id: &str) -> Option<Record> {
        let records = self.store.load().await;
        let found = lookup(&records, id).cloned();
        tracing::debug!(id, found = found.is_some(), scanned = records.len(), "Record lookup");
        found
    }
}
