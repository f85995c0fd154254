//! Bot configuration: BaseConfig (Telegram, log file, tool files) + LLM + Zep. Loaded from env.

mod base;
mod bot_config;


pub use base::{AppPaths, BaseConfig, DEFAULT_LOG_FILE, DEFAULT_TOOL_KEYS_PATH};
pub use bot_config::{missing_required_env, BotConfig, REQUIRED_ENV_VARS};
