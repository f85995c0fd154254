//! Base config: Telegram connection plus local file paths. Loaded from env.

use anyhow::{Context, Result};
use dbot_telegram::TelegramConfig;
use std::env;
use tool_registry::DEFAULT_CATALOG_PATH;

pub const DEFAULT_LOG_FILE: &str = "logs/dbot.log";
pub const DEFAULT_TOOL_KEYS_PATH: &str = "tool_keys.env";

/// Local files: log, tool catalog, secrets declaration. Also used by the offline CLI commands.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// LOG_FILE
    pub log_file: String,
    /// TOOLS_CONFIG_PATH: durable tool catalog
    pub tools_config_path: String,
    /// TOOL_KEYS_PATH: secrets declaration (`KEY=ENV_VAR_NAME` lines)
    pub tool_keys_path: String,
}

#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// TELEGRAM_BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL
    pub telegram_api_url: Option<String>,
    pub paths: AppPaths,
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl AppPaths {
    pub fn from_env() -> Self {
        Self {
            log_file: env_or("LOG_FILE", DEFAULT_LOG_FILE),
            tools_config_path: env_or("TOOLS_CONFIG_PATH", DEFAULT_CATALOG_PATH),
            tool_keys_path: env_or("TOOL_KEYS_PATH", DEFAULT_TOOL_KEYS_PATH),
        }
    }
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides TELEGRAM_BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN not set")?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Self {
            bot_token,
            telegram_api_url,
            paths: AppPaths::from_env(),
        })
    }

    /// Validate config (telegram_api_url must be a valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!("TELEGRAM_API_URL is set but not a valid URL: {}", url_str);
            }
        }
        Ok(())
    }

    pub fn telegram(&self) -> TelegramConfig {
        TelegramConfig {
            bot_token: self.bot_token.clone(),
            telegram_api_url: self.telegram_api_url.clone(),
        }
    }
}
