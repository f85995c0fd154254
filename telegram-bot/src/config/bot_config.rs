//! BotConfig: BaseConfig + LLM + Zep. Use load() for env-based loading.

use anyhow::Result;
use llm_client::{EnvLlmConfig, LlmConfig};
use memory_zep::ZepConfig;
use std::env;

use super::BaseConfig;

/// Variables that must be set (and non-empty) before anything is built.
pub const REQUIRED_ENV_VARS: [&str; 4] = [
    "GROQ_API_KEY",
    "TELEGRAM_BOT_TOKEN",
    "ZEP_API_KEY",
    "ZEP_API_URL",
];

/// Required variables that are unset or empty, in declaration order.
///
/// `token_supplied` drops TELEGRAM_BOT_TOKEN from the check when the token comes from the CLI.
pub fn missing_required_env(token_supplied: bool) -> Vec<&'static str> {
    REQUIRED_ENV_VARS
        .iter()
        .copied()
        .filter(|name| !(token_supplied && *name == "TELEGRAM_BOT_TOKEN"))
        .filter(|name| env::var(name).map(|v| v.trim().is_empty()).unwrap_or(true))
        .collect()
}

pub struct BotConfig {
    pub base: BaseConfig,
    pub llm: EnvLlmConfig,
    pub zep: ZepConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides
    /// TELEGRAM_BOT_TOKEN. Fails listing every missing required variable.
    pub fn load(token: Option<String>) -> Result<Self> {
        let missing = missing_required_env(token.is_some());
        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }
        Ok(Self {
            base: BaseConfig::load(token)?,
            llm: EnvLlmConfig::from_env()?,
            zep: ZepConfig::from_env()?,
        })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        for (name, url) in [
            ("GROQ_BASE_URL", self.llm.base_url()),
            ("ZEP_API_URL", self.zep.api_url.as_str()),
        ] {
            if reqwest::Url::parse(url).is_err() {
                anyhow::bail!("{} is not a valid URL: {}", name, url);
            }
        }
        Ok(())
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn log_file(&self) -> &str {
        &self.base.paths.log_file
    }
    pub fn tools_config_path(&self) -> &str {
        &self.base.paths.tools_config_path
    }
    pub fn tool_keys_path(&self) -> &str {
        &self.base.paths.tool_keys_path
    }
}
