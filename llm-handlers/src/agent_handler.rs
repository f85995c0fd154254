//! Free-text handler: shows "typing", runs the agent, replies with its answer or the apology.

use std::sync::Arc;

use agent::AgentOrchestrator;
use async_trait::async_trait;
use dbot_core::{Bot, Handler, HandlerResponse, Message, Result};
use tracing::{error, info, instrument, warn};

use crate::texts;

pub struct AgentHandler {
    bot: Arc<dyn Bot>,
    agent: AgentOrchestrator,
}

impl AgentHandler {
    pub fn new(bot: Arc<dyn Bot>, agent: AgentOrchestrator) -> Self {
        Self { bot, agent }
    }

    async fn answer(&self, user_id: &str, text: &str) -> String {
        match self.agent.process_message(user_id, text).await {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => {
                warn!(user_id = %user_id, "Agent returned an empty reply");
                texts::PROCESSING_ERROR.to_string()
            }
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Error processing message");
                texts::PROCESSING_ERROR.to_string()
            }
        }
    }
}

#[async_trait]
impl Handler for AgentHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.command().is_some() {
            return Ok(HandlerResponse::Ignore);
        }

        if let Err(e) = self.bot.send_typing(&message.chat).await {
            warn!(error = %e, "Failed to send typing action");
        }

        let user_id = message.user.id.to_string();
        let reply = self.answer(&user_id, &message.content).await;
        self.bot.reply_to(message, &reply).await?;
        info!(reply_len = reply.len(), "step: reply sent");
        Ok(HandlerResponse::Reply(reply))
    }
}
