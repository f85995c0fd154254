//! # Telegram bot application
//!
//! Wires dbot-telegram, handler-chain, llm-handlers and the agent. Loads config from env and runs
//! the REPL.
//!
//! Startup order: required-variable check ([`BotConfig::load`]), logging, tool registry (catalog
//! file + secrets declaration), Zep collection bootstrap, agent, handler chain, long polling.

pub mod components;
pub mod config;
pub mod runner;

pub use components::{
    build_agent, build_bot_components, build_handler_chain, build_memory, build_registry,
    load_secret_resolver, BotComponents,
};
pub use config::{missing_required_env, AppPaths, BaseConfig, BotConfig, REQUIRED_ENV_VARS};
pub use runner::run_bot;
