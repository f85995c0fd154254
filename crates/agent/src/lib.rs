//! # Agent
//!
//! Orchestrates one conversation turn: builds the system prompt from user memory and the tool
//! registry, runs a bounded tool-call loop against an [`llm_client::LlmClient`], and dispatches
//! tool calls, including the registry commands that let the model create, edit and delete tools.
//!
//! ## Modules
//!
//! - [`orchestrator`] - [`AgentOrchestrator`] and the loop state machine
//! - [`executor`] - [`ToolExecutor`], handlers and secret injection
//! - [`command`] - [`RegistryCommand`] decoding, validation and rendering
//! - [`catalog`] - registry views for the model and the prompt

pub mod catalog;
pub mod command;
pub mod executor;
pub mod orchestrator;

pub use catalog::{model_facing_schema, prompt_entries, tool_definitions};
pub use command::{command_definitions, CommandError, RegistryCommand, COMMAND_NAMES};
pub use executor::{
    CalculatePlaceholder, SearchWebPlaceholder, SharedRegistry, ToolExecutor, ToolHandler,
    ToolInvocation, NOT_IMPLEMENTED,
};
pub use orchestrator::{AgentOrchestrator, LoopState, MAX_ITERATIONS_REPLY};
