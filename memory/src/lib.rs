//! # Memory Crate
//!
//! Per-user memory: a flat `key -> JSON value` mapping stored as JSON blobs in a
//! [`DocumentStore`] (Zep in production, in-memory in tests).
//!
//! ## Semantics
//!
//! - [`UserMemory::get`] merges every blob of the user in `created_at` order, later blobs
//!   winning per key. Blobs that are not JSON objects are skipped and logged.
//! - [`UserMemory::set`] reads, merges, writes the whole mapping as a new blob, then deletes the
//!   blobs it superseded.
//! - [`UserMemory::clear`] deletes every blob of the user.
//!
//! ## Modules
//!
//! - [`user_memory`] - the facade
//!
//! Store types are re-exported from `memory-core`.

pub mod user_memory;

pub use memory_core::{
    DocumentMetadata, DocumentStore, MemoryError, NewDocument, Result, StoredDocument,
};
pub use user_memory::{fact_text, Facts, UserMemory};
