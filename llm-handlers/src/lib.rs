//! # llm-handlers
//!
//! Handlers for the Telegram agent, run in this order by the handler chain:
//!
//! - [`CommandHandler`]: `/start`, `/help`, `/tools`, `/memory`, `/clear`
//! - [`AgentHandler`]: every other text message goes to the agent orchestrator
//!
//! User-facing texts live in [`texts`].

mod agent_handler;
mod command_handler;
pub mod texts;

pub use agent_handler::AgentHandler;
pub use command_handler::{format_memories, format_tools, CommandHandler};
