//! Interactive terminal chat with the agent.
//!
//! Used by the `chat` subcommand: reads lines from stdin until EOF or /exit.

use std::io::{self, Write};

use agent::AgentOrchestrator;
use anyhow::Result;
use llm_client::EnvLlmConfig;
use memory_zep::ZepConfig;
use telegram_bot::{build_agent, build_memory, build_registry, AppPaths};

/// One line typed by the user.
#[derive(Debug, PartialEq, Eq)]
pub enum ChatInput<'a> {
    Empty,
    Help,
    Exit,
    Message(&'a str),
}

pub fn parse_line(line: &str) -> ChatInput<'_> {
    match line.trim() {
        "" => ChatInput::Empty,
        "/help" => ChatInput::Help,
        "/exit" | "/quit" => ChatInput::Exit,
        text => ChatInput::Message(text),
    }
}

/// Prints help message for interactive chat commands.
pub fn print_help() {
    println!("Available commands:");
    println!("  /help    - Show this help message");
    println!("  /exit    - Exit the chat");
    println!("  /quit    - Exit the chat");
    println!("  Any other text will be sent to the agent.");
}

/// Builds the agent from env: Groq config, Zep memory, and the registry from the local files.
pub async fn build_chat_agent() -> Result<AgentOrchestrator> {
    let paths = AppPaths::from_env();
    let llm = EnvLlmConfig::from_env()?;
    let zep = ZepConfig::from_env()?;
    let registry = build_registry(&paths.tools_config_path, &paths.tool_keys_path)?;
    let memory = build_memory(&zep).await?;
    Ok(build_agent(&llm, registry, memory))
}

/// Interactive chat loop for `user_id`. Errors of a single turn are printed and the loop goes on.
pub async fn run_chat_loop(agent: &AgentOrchestrator, user_id: &str) -> Result<()> {
    println!("dbot chat as '{}' (type /help for commands, /exit to quit)", user_id);
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        match parse_line(&line) {
            ChatInput::Empty => continue,
            ChatInput::Help => print_help(),
            ChatInput::Exit => {
                println!("Goodbye!");
                break;
            }
            ChatInput::Message(text) => match agent.process_message(user_id, text).await {
                Ok(reply) => println!("{}\n", reply),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    eprintln!("(You can continue chatting or type /exit to quit)");
                }
            },
        }
    }
    Ok(())
}
