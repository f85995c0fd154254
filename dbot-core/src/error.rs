use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbotError {
    /// Transport failure while talking to the chat platform.
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DbotError>;
