//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait and an OpenAI-compatible implementation. Transport-agnostic;
//! used by the agent orchestrator, which can substitute a scripted client in tests.
//!
//! Each call sends the whole transcript plus the tool catalog and returns either text or the
//! tool calls the model selected.

use anyhow::Result;
use async_trait::async_trait;
use openai_client::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolArgs, ChatCompletionToolType, FunctionCall,
    FunctionObjectArgs,
};
use prompt::{ChatMessage, MessageRole, ToolCall};

mod config;
mod openai_llm;

pub use config::{EnvLlmConfig, LlmConfig, DEFAULT_BASE_URL, DEFAULT_MAX_ITERATIONS, DEFAULT_MODEL};
pub use openai_llm::OpenAILlmClient;

/// A function the model may call: name, description and JSON-schema parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Model reply for one round: text, tool calls, or both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl LlmReply {
    /// Final text reply without tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// Reply requesting a single tool call.
    pub fn tool_call(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            content: None,
            tool_calls: vec![ToolCall {
                id: id.into(),
                name: name.into(),
                arguments: arguments.into(),
            }],
        }
    }
}

/// LLM client interface: one chat-completion round with function tools.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends `messages` and offers `tools`; returns the first choice.
    async fn complete_with_tools(
        &self,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
    ) -> Result<LlmReply>;
}

/// Converts a single [`ChatMessage`] into OpenAI API message format.
fn chat_message_to_openai(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let content = msg.content.clone();
    let openai_msg: ChatCompletionRequestMessage = match msg.role {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::Assistant => {
            let mut args = ChatCompletionRequestAssistantMessageArgs::default();
            if !content.is_empty() {
                args.content(content);
            }
            if !msg.tool_calls.is_empty() {
                args.tool_calls(
                    msg.tool_calls
                        .iter()
                        .map(tool_call_to_openai)
                        .collect::<Vec<_>>(),
                );
            }
            args.build()?.into()
        }
        MessageRole::Tool => ChatCompletionRequestToolMessageArgs::default()
            .content(content)
            .tool_call_id(msg.tool_call_id.clone().unwrap_or_default())
            .build()?
            .into(),
    };
    Ok(openai_msg)
}

fn tool_call_to_openai(call: &ToolCall) -> ChatCompletionMessageToolCall {
    ChatCompletionMessageToolCall {
        id: call.id.clone(),
        r#type: ChatCompletionToolType::Function,
        function: FunctionCall {
            name: call.name.clone(),
            arguments: call.arguments.clone(),
        },
    }
}

fn tool_call_from_openai(call: ChatCompletionMessageToolCall) -> ToolCall {
    ToolCall {
        id: call.id,
        name: call.function.name,
        arguments: call.function.arguments,
    }
}

/// Converts a [`ToolDefinition`] into an OpenAI function tool.
fn tool_definition_to_openai(def: &ToolDefinition) -> Result<ChatCompletionTool> {
    let function = FunctionObjectArgs::default()
        .name(def.name.clone())
        .description(def.description.clone())
        .parameters(def.parameters.clone())
        .build()?;
    Ok(ChatCompletionToolArgs::default()
        .r#type(ChatCompletionToolType::Function)
        .function(function)
        .build()?)
}
