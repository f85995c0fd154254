//! CLI parser.

use clap::{Parser, Subcommand};

/// Root CLI: holds a single subcommand, dispatched in `main.rs`.
#[derive(Parser, Debug)]
#[command(name = "dbot")]
#[command(about = "Telegram agent with a self-modifying tool registry", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token can override TELEGRAM_BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Print the tool catalog stored in TOOLS_CONFIG_PATH (default tools_config.json).
    Tools,

    /// Chat with the agent in the terminal. Needs GROQ_API_KEY, ZEP_API_URL and ZEP_API_KEY.
    Chat {
        /// User id the memories are stored under.
        #[arg(short, long, default_value = "cli")]
        user: String,

        /// Log to stdout and LOG_FILE while chatting.
        #[arg(short, long)]
        verbose: bool,
    },
}
