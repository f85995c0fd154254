//! The agent loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use llm_client::{LlmClient, DEFAULT_MAX_ITERATIONS};
use memory::{fact_text, Facts, MemoryError, UserMemory};
use prompt::{format_agent_system_prompt, ChatMessage, ToolCall};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::catalog::{prompt_entries, tool_definitions};
use crate::executor::{SharedRegistry, ToolExecutor};

/// Reply when the model keeps calling tools past the round limit.
pub const MAX_ITERATIONS_REPLY: &str = "Maximum iterations reached without a final response";

/// States of the tool-use loop. `round` counts model calls already made.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    AwaitingModel { round: usize },
    ExecutingTool { round: usize, call: ToolCall },
    Done(String),
    Exhausted,
}

/// Answers one user message: prompt from memory and registry, then a bounded tool-call loop.
#[derive(Clone)]
pub struct AgentOrchestrator {
    llm: Arc<dyn LlmClient>,
    executor: ToolExecutor,
    memory: UserMemory,
    max_iterations: usize,
}

impl AgentOrchestrator {
    pub fn new(llm: Arc<dyn LlmClient>, registry: SharedRegistry, memory: UserMemory) -> Self {
        Self {
            llm,
            executor: ToolExecutor::new(registry),
            memory,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Replaces the executor (custom tool handlers).
    pub fn with_executor(mut self, executor: ToolExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn registry(&self) -> &SharedRegistry {
        self.executor.registry()
    }

    pub fn memory(&self) -> &UserMemory {
        &self.memory
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Stores one fact for `user_id`.
    pub async fn update_user_memory(
        &self,
        user_id: &str,
        key: &str,
        value: Value,
    ) -> Result<Facts, MemoryError> {
        self.memory.set(user_id, key, value).await
    }

    /// System prompt for `user_id`. A memory failure is logged and the prompt is built without memories.
    pub async fn build_system_prompt(&self, user_id: &str) -> String {
        let facts = match self.memory.get(user_id).await {
            Ok(facts) => facts,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to load memories");
                Facts::new()
            }
        };
        let registry = self.registry().lock().await;
        let entries = prompt_entries(&registry.list_all());
        format_agent_system_prompt(
            facts.iter().map(|(k, v)| (k.as_str(), fact_text(v))),
            &entries,
            registry.secret_availability(),
        )
    }

    /// Runs the loop for one message and returns the final text.
    ///
    /// Only the first tool call of a reply is executed. Errors come from the model call only;
    /// tool failures are fed back to the model as text.
    #[instrument(skip(self, text), fields(user_id = %user_id))]
    pub async fn process_message(&self, user_id: &str, text: &str) -> Result<String> {
        info!(text_len = text.len(), "step: agent processing message");
        let system_prompt = self.build_system_prompt(user_id).await;
        let mut transcript = vec![ChatMessage::system(system_prompt), ChatMessage::user(text)];
        let mut state = LoopState::AwaitingModel { round: 0 };

        loop {
            state = match state {
                LoopState::AwaitingModel { round } if round >= self.max_iterations => {
                    LoopState::Exhausted
                }
                LoopState::AwaitingModel { round } => {
                    let tools = {
                        let registry = self.registry().lock().await;
                        tool_definitions(&registry.list_all())
                    };
                    let reply = self
                        .llm
                        .complete_with_tools(transcript.clone(), tools)
                        .await
                        .with_context(|| format!("model call failed in round {}", round + 1))?;
                    match reply.tool_calls.into_iter().next() {
                        Some(call) => LoopState::ExecutingTool { round, call },
                        None => LoopState::Done(reply.content.unwrap_or_default()),
                    }
                }
                LoopState::ExecutingTool { round, call } => {
                    info!(round = round + 1, tool = %call.name, "step: executing tool");
                    let result = self.executor.execute(&call).await;
                    let call_id = call.id.clone();
                    transcript.push(ChatMessage::assistant_tool_calls(vec![call]));
                    transcript.push(ChatMessage::tool_result(call_id, result));
                    LoopState::AwaitingModel { round: round + 1 }
                }
                LoopState::Done(reply) => {
                    info!(reply_len = reply.len(), "step: agent done");
                    return Ok(reply);
                }
                LoopState::Exhausted => {
                    warn!(max_iterations = self.max_iterations, "Agent loop exhausted");
                    return Ok(MAX_ITERATIONS_REPLY.to_string());
                }
            };
        }
    }
}
