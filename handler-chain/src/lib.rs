//! # Handler chain
//!
//! Runs a sequence of handlers for each message: every `before` in order (any `false` stops the
//! chain), then `handle` until one returns Stop or Reply, then every `after` in reverse order with
//! the final response.

use async_trait::async_trait;
use dbot_core::{Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Ordered list of handlers.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler (runs in order; first Stop/Reply ends the handle phase).
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs the chain for `message`. Returns the first Stop or Reply, or Continue.
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        info!(message_id = %message.id, "step: handler_chain started");

        for handler in &self.handlers {
            if !handler.before(message).await? {
                info!(
                    handler = %std::any::type_name_of_val(handler.as_ref()),
                    "step: handler before returned false, chain stopped"
                );
                return Ok(HandlerResponse::Stop);
            }
        }

        let mut final_response = HandlerResponse::Continue;
        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            let response = handler.handle(message).await?;
            debug!(handler = %handler_name, response = ?response, "Handler processed");
            match response {
                HandlerResponse::Stop | HandlerResponse::Reply(_) => {
                    info!(handler = %handler_name, "step: handler chain stopped by handler");
                    final_response = response;
                    break;
                }
                HandlerResponse::Continue | HandlerResponse::Ignore => continue,
            }
        }

        for handler in self.handlers.iter().rev() {
            handler.after(message, &final_response).await?;
        }

        info!(message_id = %message.id, "step: handler_chain finished");
        Ok(final_response)
    }
}

/// Stops the chain for messages without text (stickers, photos, empty updates).
pub struct TextGuard;

#[async_trait]
impl Handler for TextGuard {
    async fn before(&self, message: &Message) -> Result<bool> {
        let has_text = !message.content.trim().is_empty();
        if !has_text {
            debug!(message_id = %message.id, "Non-text message ignored");
        }
        Ok(has_text)
    }
}
