//! # dbot-telegram
//!
//! Telegram layer: adapters, [`dbot_core::Bot`] implementation, connection config and REPL runner.
//! Handles only Telegram connectivity and handler-chain execution; no registry, memory or agent logic.

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::{split_message, TelegramBotAdapter, MAX_MESSAGE_CHARS};
pub use config::TelegramConfig;
pub use runner::run_repl;
