//! # Document Storage
//!
//! The [`DocumentStore`] trait is the narrow interface the memory facade needs from an external
//! document service: add a blob, list a user's blobs, delete one by uuid.

use async_trait::async_trait;

use crate::error::MemoryError;
use crate::types::{NewDocument, StoredDocument};

/// Trait for storing and retrieving memory documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Makes sure the backing collection exists. Idempotent.
    async fn ensure_collection(&self) -> Result<(), MemoryError>;

    /// Adds a document and returns the uuid the store assigned.
    async fn add(&self, document: NewDocument) -> Result<String, MemoryError>;

    /// Returns every document tagged with `user_id`, in no particular order.
    async fn search_by_user(&self, user_id: &str) -> Result<Vec<StoredDocument>, MemoryError>;

    /// Deletes a document by uuid.
    async fn delete(&self, uuid: &str) -> Result<(), MemoryError>;
}
