use crate::storage::{self, KeyValueStore, HISTORY_KEY};
use std::sync::Arc;
use tracing::warn;

pub const HISTORY_CAPACITY: usize = 5;

/// Recent distinct queries, most recent first.
pub struct SearchHistory {
    storage: Arc<dyn KeyValueStore>,
    entries: Vec<String>,
}

impl SearchHistory {
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut entries: Vec<String> =
            storage::load_json(storage.as_ref(), HISTORY_KEY).unwrap_or_default();
        entries.truncate(HISTORY_CAPACITY);
        Self { storage, entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Move `query` to the front, replacing any case-insensitive duplicate.
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        let lower = query.to_lowercase();
        self.entries.retain(|q| q.to_lowercase() != lower);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(HISTORY_CAPACITY);
        self.persist();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = storage::save_json(self.storage.as_ref(), HISTORY_KEY, &self.entries) {
            warn!("Failed to persist search history: {:#}", e);
        }
    }
}
