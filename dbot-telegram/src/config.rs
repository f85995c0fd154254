//! Telegram connection settings: token and optional API URL.

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Custom Bot API server (tests point this at a mock).
    pub telegram_api_url: Option<String>,
}

impl TelegramConfig {
    /// Loads `TELEGRAM_BOT_TOKEN` (required) and `TELEGRAM_API_URL` (optional).
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN not set")?;
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        Ok(Self {
            bot_token,
            telegram_api_url,
        })
    }

    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
        }
    }

    /// Builds the teloxide bot, pointing it at `telegram_api_url` when set.
    pub fn build_bot(&self) -> Result<teloxide::Bot> {
        let bot = teloxide::Bot::new(self.bot_token.clone());
        match &self.telegram_api_url {
            Some(url) => {
                let url = reqwest::Url::parse(url)
                    .with_context(|| format!("Invalid TELEGRAM_API_URL: {}", url))?;
                Ok(bot.set_api_url(url))
            }
            None => Ok(bot),
        }
    }
}
