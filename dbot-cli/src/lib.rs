//! # dbot-cli
//!
//! Argument parsing and the offline subcommands (`tools`, `chat`). `run` is handed to
//! [`telegram_bot::run_bot`].

pub mod chat;
pub mod cli;
pub mod tools;

pub use cli::{Cli, Commands};
