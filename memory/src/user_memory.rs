//! The [`UserMemory`] facade over a [`DocumentStore`].

use std::sync::Arc;

use memory_core::{DocumentMetadata, DocumentStore, MemoryError, NewDocument, StoredDocument};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Merged facts of one user, keyed by fact name.
pub type Facts = serde_json::Map<String, Value>;

/// Renders a fact value for humans: strings without quotes, everything else as JSON.
pub fn fact_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Per-user memory backed by a document store.
#[derive(Clone)]
pub struct UserMemory {
    store: Arc<dyn DocumentStore>,
}

impl UserMemory {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Ensures the backing collection exists.
    pub async fn init(&self) -> Result<(), MemoryError> {
        self.store.ensure_collection().await
    }

    async fn load(&self, user_id: &str) -> Result<Vec<StoredDocument>, MemoryError> {
        let mut docs = self.store.search_by_user(user_id).await?;
        // Stable: documents without a timestamp keep the store's order and sort first.
        docs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(docs)
    }

    fn merge(user_id: &str, docs: &[StoredDocument]) -> Facts {
        let mut facts = Facts::new();
        for doc in docs {
            match serde_json::from_str::<Value>(&doc.content) {
                Ok(Value::Object(map)) => facts.extend(map),
                Ok(_) => {
                    warn!(user_id = %user_id, uuid = %doc.uuid, "Memory blob is not a JSON object, skipping");
                }
                Err(e) => {
                    warn!(user_id = %user_id, uuid = %doc.uuid, error = %e, "Unparseable memory blob, skipping");
                }
            }
        }
        facts
    }

    /// Returns the merged facts for `user_id` (empty when nothing is stored).
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: &str) -> Result<Facts, MemoryError> {
        let docs = self.load(user_id).await?;
        let facts = Self::merge(user_id, &docs);
        debug!(blobs = docs.len(), facts = facts.len(), "step: memory loaded");
        Ok(facts)
    }

    /// Sets `key` to `value` for `user_id` and returns the resulting facts.
    #[instrument(skip(self, value))]
    pub async fn set(&self, user_id: &str, key: &str, value: Value) -> Result<Facts, MemoryError> {
        let docs = self.load(user_id).await?;
        let mut facts = Self::merge(user_id, &docs);
        facts.insert(key.to_string(), value);

        let content = serde_json::to_string(&facts)
            .map_err(|e| MemoryError::parse(format!("serialize facts: {}", e)))?;
        let uuid = self
            .store
            .add(NewDocument {
                content,
                metadata: DocumentMetadata::user_memory(user_id),
            })
            .await?;

        for doc in &docs {
            if let Err(e) = self.store.delete(&doc.uuid).await {
                warn!(uuid = %doc.uuid, error = %e, "Failed to delete superseded memory blob");
            }
        }
        info!(uuid = %uuid, superseded = docs.len(), "step: memory updated");
        Ok(facts)
    }

    /// Deletes every blob of `user_id`; returns how many were removed.
    #[instrument(skip(self))]
    pub async fn clear(&self, user_id: &str) -> Result<usize, MemoryError> {
        let docs = self.store.search_by_user(user_id).await?;
        for doc in &docs {
            self.store.delete(&doc.uuid).await?;
        }
        info!(removed = docs.len(), "step: memory cleared");
        Ok(docs.len())
    }
}
