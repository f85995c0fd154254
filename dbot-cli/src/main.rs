//! dbot CLI: run the Telegram agent, list the tool catalog, or chat in the terminal.

use anyhow::Result;
use clap::Parser;
use dbot_cli::{chat, tools, Cli, Commands};
use telegram_bot::{run_bot, AppPaths, BotConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = BotConfig::load(token)?;
            run_bot(config).await
        }
        Commands::Tools => {
            let paths = AppPaths::from_env();
            print!("{}", tools::describe_catalog(&paths.tools_config_path)?);
            Ok(())
        }
        Commands::Chat { user, verbose } => {
            if verbose {
                dbot_core::init_tracing(&AppPaths::from_env().log_file)?;
            }
            let agent = chat::build_chat_agent().await?;
            chat::run_chat_loop(&agent, &user).await
        }
    }
}
