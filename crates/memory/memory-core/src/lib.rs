//! # Memory Core
//!
//! Types, error and storage trait shared by the memory facade and its backends
//! (`memory-inmemory`, `memory-zep`).

pub mod error;
pub mod store;
pub mod types;

pub use error::{MemoryError, Result};
pub use store::DocumentStore;
pub use types::{DocumentMetadata, NewDocument, StoredDocument, USER_MEMORY_KIND};
