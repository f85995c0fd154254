//! # Core Types
//!
//! Documents held by a [`DocumentStore`](crate::DocumentStore).
//!
//! ## DocumentMetadata
//!
//! Tags every document with its owner and kind; stores filter on `user_id`.
//!
//! ## NewDocument / StoredDocument
//!
//! A document before and after the store assigns it a `uuid` and a creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind tag for user memory blobs.
pub const USER_MEMORY_KIND: &str = "user_memory";

/// Metadata associated with a memory document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Owner of the document.
    pub user_id: String,
    /// Document kind, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl DocumentMetadata {
    /// Metadata for a user memory blob.
    pub fn user_memory(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            kind: USER_MEMORY_KIND.to_string(),
        }
    }
}

/// A document to be added to a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewDocument {
    /// Serialized JSON object of facts.
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// A document as returned by a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredDocument {
    pub uuid: String,
    pub content: String,
    pub metadata: DocumentMetadata,
    /// Creation time reported by the store, if any.
    pub created_at: Option<DateTime<Utc>>,
}
