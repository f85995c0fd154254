//! Slash commands: `/start`, `/help`, `/tools`, `/memory`, `/clear`.

use std::sync::Arc;

use agent::SharedRegistry;
use async_trait::async_trait;
use dbot_core::{Bot, Handler, HandlerResponse, Message, Result};
use memory::{fact_text, UserMemory};
use serde_json::Value;
use tool_registry::Tool;
use tracing::{error, info, instrument, warn};

use crate::texts;

/// Answers the five slash commands; plain text is left for the next handler.
///
/// Unknown commands stop the chain without a reply.
pub struct CommandHandler {
    bot: Arc<dyn Bot>,
    registry: SharedRegistry,
    memory: UserMemory,
}

/// Renders the `/tools` listing.
pub fn format_tools(tools: &[Tool]) -> String {
    if tools.is_empty() {
        return texts::NO_TOOLS.to_string();
    }
    let mut out = texts::TOOLS_HEADER.to_string();
    for tool in tools {
        out.push_str(&format!("• {}: {}\n", tool.name(), tool.description()));
        out.push_str(&format!("  Parâmetros: {}\n", tool.parameters()));
        out.push_str(&format!("  Criado em: {}\n", tool.created_at().to_rfc3339()));
        out.push_str(&format!(
            "  Última modificação: {}\n\n",
            tool.last_modified().to_rfc3339()
        ));
    }
    out
}

/// Renders the `/memory` listing.
pub fn format_memories<'a>(facts: impl IntoIterator<Item = (&'a String, &'a Value)>) -> String {
    let mut lines = String::new();
    for (key, value) in facts {
        lines.push_str(&format!("• {}: {}\n", key, fact_text(value)));
    }
    if lines.is_empty() {
        texts::NO_MEMORIES.to_string()
    } else {
        format!("{}{}", texts::MEMORY_HEADER, lines)
    }
}

impl CommandHandler {
    pub fn new(bot: Arc<dyn Bot>, registry: SharedRegistry, memory: UserMemory) -> Self {
        Self {
            bot,
            registry,
            memory,
        }
    }

    async fn remember_language(&self, user_id: &str) {
        if let Err(e) = self
            .memory
            .set(
                user_id,
                texts::LANGUAGE_KEY,
                Value::String(texts::DEFAULT_LANGUAGE.to_string()),
            )
            .await
        {
            warn!(user_id = %user_id, error = %e, "Failed to store language preference");
        }
    }

    async fn tools(&self) -> String {
        let tools = self.registry.lock().await.list_all();
        format_tools(&tools)
    }

    async fn memories(&self, user_id: &str) -> String {
        match self.memory.get(user_id).await {
            Ok(facts) => format_memories(facts.iter()),
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Failed to load memories");
                texts::PROCESSING_ERROR.to_string()
            }
        }
    }

    async fn clear(&self, user_id: &str) -> String {
        match self.memory.clear(user_id).await {
            Ok(_) => texts::MEMORY_CLEARED.to_string(),
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Failed to clear memories");
                texts::PROCESSING_ERROR.to_string()
            }
        }
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some((command, _args)) = message.command() else {
            return Ok(HandlerResponse::Continue);
        };
        let user_id = message.user.id.to_string();
        info!(command = %command, "step: command received");

        let reply = match command {
            "start" => {
                self.bot.reply_to(message, texts::WELCOME).await?;
                self.remember_language(&user_id).await;
                return Ok(HandlerResponse::Reply(texts::WELCOME.to_string()));
            }
            "help" => texts::HELP.to_string(),
            "tools" => self.tools().await,
            "memory" => self.memories(&user_id).await,
            "clear" => self.clear(&user_id).await,
            other => {
                info!(command = %other, "Unknown command ignored");
                return Ok(HandlerResponse::Stop);
            }
        };

        self.bot.reply_to(message, &reply).await?;
        Ok(HandlerResponse::Reply(reply))
    }
}
