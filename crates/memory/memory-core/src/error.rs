//! Memory error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    /// The document service failed or answered with an error status.
    #[error("Memory service error: {0}")]
    Service(String),

    /// A response or document body could not be decoded.
    #[error("Memory parse error: {0}")]
    Parse(String),
}

impl MemoryError {
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

pub type Result<T> = std::result::Result<T, MemoryError>;
