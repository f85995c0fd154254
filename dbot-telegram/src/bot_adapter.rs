//! Wraps teloxide::Bot and implements [`dbot_core::Bot`]. Tests substitute another Bot impl.

use async_trait::async_trait;
use dbot_core::{Bot as CoreBot, Chat, DbotError, Message, Result};
use teloxide::{
    prelude::*,
    types::{ChatAction, ChatId},
};

/// Telegram rejects longer text messages. The limit counts UTF-16 code units.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Splits `text` into parts of at most [`MAX_MESSAGE_CHARS`] UTF-16 code units, breaking
/// after the last newline of a part when there is one.
pub fn split_message(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest: Vec<char> = text.chars().collect();
    loop {
        // Index of the first char that would push the part over the limit.
        let mut units = 0;
        let limit = rest.iter().position(|c| {
            units += c.len_utf16();
            units > MAX_MESSAGE_CHARS
        });
        let Some(limit) = limit else { break };
        let cut = rest[..limit]
            .iter()
            .rposition(|c| *c == '\n')
            .filter(|i| *i > 0)
            .map(|i| i + 1)
            .unwrap_or(limit);
        parts.push(rest[..cut].iter().collect());
        rest.drain(..cut);
    }
    if !rest.is_empty() || parts.is_empty() {
        parts.push(rest.into_iter().collect());
    }
    parts
}

/// Thin wrapper around teloxide::Bot that implements dbot-core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        for part in split_message(text) {
            self.bot
                .send_message(ChatId(chat.id), part)
                .await
                .map_err(|e| DbotError::Bot(e.to_string()))?;
        }
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }

    async fn send_typing(&self, chat: &Chat) -> Result<()> {
        self.bot
            .send_chat_action(ChatId(chat.id), ChatAction::Typing)
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }
}
