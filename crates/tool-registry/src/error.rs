//! Registry error types.
//!
//! Returned by [`crate::ToolRegistry`] mutations and by the catalog file loader.

use thiserror::Error;

/// Errors raised by registry operations and catalog persistence.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Tool with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Tool with name '{0}' not found")]
    NotFound(String),

    #[error("Missing required environment variables for tool '{tool}': {}", missing.join(", "))]
    MissingSecret { tool: String, missing: Vec<String> },

    #[error("Tool catalog {path} is malformed: {source}")]
    MalformedCatalog {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to persist tool catalog {path}: {message}")]
    Persistence { path: String, message: String },

    #[error("Secrets declaration error: {0}")]
    SecretsDeclaration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
