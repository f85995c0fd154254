//! Bot abstraction for sending messages and chat actions.
//!
//! [`Bot`] is transport-agnostic; dbot-telegram implements it via teloxide and tests substitute
//! a recording mock.

use crate::error::Result;
use crate::types::{Chat, Message};
use async_trait::async_trait;

/// Abstraction for talking back to a chat. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends a reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;
    /// Shows the "typing..." indicator in the chat.
    async fn send_typing(&self, chat: &Chat) -> Result<()>;
}
