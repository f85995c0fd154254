//! Application entry: logging, components, handler chain, REPL.

use std::sync::Arc;

use anyhow::Result;
use dbot_core::{init_tracing, Bot};
use dbot_telegram::{run_repl, TelegramBotAdapter};
use llm_client::LlmConfig;
use tracing::{info, instrument};

use super::components::{build_bot_components, build_handler_chain};
use super::config::BotConfig;

/// Main entry: init logging, validate config, build components and handler chain, then run REPL.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    init_tracing(config.log_file())?;
    config.validate()?;

    info!(
        tools_config = %config.tools_config_path(),
        tool_keys = %config.tool_keys_path(),
        model = %config.llm.model(),
        "Initializing bot"
    );

    let components = build_bot_components(&config).await?;
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(components.teloxide_bot.clone()));
    let handler_chain = build_handler_chain(&components, bot);

    info!(handlers = handler_chain.len(), "Bot started successfully");

    run_repl(components.teloxide_bot, handler_chain).await
}
