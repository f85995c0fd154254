//! # In-Memory Document Store
//!
//! In-memory implementation of [`memory_core::DocumentStore`] for tests and the offline CLI.
//! Data is lost on restart.
//!
//! ## Thread Safety
//!
//! The store uses `Arc<RwLock<>>`; clones share the same documents.

use async_trait::async_trait;
use chrono::Utc;
use memory_core::{DocumentStore, MemoryError, NewDocument, StoredDocument};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// In-memory document store. Documents are kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<Vec<StoredDocument>>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents across all users.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Returns true if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Inserts an already-stored document as-is (test setup for corrupt or backdated blobs).
    pub async fn insert_raw(&self, document: StoredDocument) {
        self.documents.write().await.push(document);
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn ensure_collection(&self) -> Result<(), MemoryError> {
        Ok(())
    }

    async fn add(&self, document: NewDocument) -> Result<String, MemoryError> {
        let uuid = Uuid::new_v4().to_string();
        let stored = StoredDocument {
            uuid: uuid.clone(),
            content: document.content,
            metadata: document.metadata,
            created_at: Some(Utc::now()),
        };
        debug!(uuid = %uuid, user_id = %stored.metadata.user_id, "Document added");
        self.documents.write().await.push(stored);
        Ok(uuid)
    }

    async fn search_by_user(&self, user_id: &str) -> Result<Vec<StoredDocument>, MemoryError> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|d| d.metadata.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, uuid: &str) -> Result<(), MemoryError> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|d| d.uuid != uuid);
        if documents.len() == before {
            return Err(MemoryError::service(format!("document {} not found", uuid)));
        }
        Ok(())
    }
}
