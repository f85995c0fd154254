//! # dbot-core
//!
//! Core types and traits for the Telegram agent: [`Bot`], [`Handler`], message and user types,
//! errors and tracing initialization. Transport-agnostic; used by dbot-telegram, handler-chain
//! and llm-handlers.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use error::{DbotError, Result};
pub use logger::init_tracing;
pub use types::{
    Chat, Handler, HandlerResponse, Message, MessageDirection, ToCoreMessage, ToCoreUser, User,
};
