//! REPL runner: converts teloxide messages to core messages and passes them to the HandlerChain.

use anyhow::Result;
use dbot_core::ToCoreMessage;
use handler_chain::HandlerChain;
use teloxide::prelude::*;
use tracing::{error, info, instrument, warn};

use crate::adapters::TelegramMessageWrapper;

/// Starts the long-polling REPL. Each update is processed to completion before the handler
/// returns, so messages of one chat are handled one at a time.
#[instrument(skip(bot, handler_chain))]
pub async fn run_repl(bot: teloxide::Bot, handler_chain: HandlerChain) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(username = ?me.user.username, "step: bot identity fetched"),
        Err(e) => warn!(error = %e, "get_me failed, continuing"),
    }

    teloxide::repl(bot, move |msg: teloxide::types::Message| {
        let chain = handler_chain.clone();
        async move {
            let core_msg = TelegramMessageWrapper(&msg).to_core();
            info!(
                user_id = core_msg.user.id,
                chat_id = core_msg.chat.id,
                message_type = %core_msg.message_type,
                "Received message"
            );
            if let Err(e) = chain.handle(&core_msg).await {
                error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
            }
            respond(())
        }
    })
    .await;

    Ok(())
}
