//! # OpenAI API client
//!
//! Thin wrapper around [async-openai] for chat completion with function tools. Works against any
//! OpenAI-compatible endpoint (Groq is used in production via `with_base_url`).
//! Provides token masking for safe logging and a simple request/response API.

use async_openai::{types::CreateChatCompletionRequestArgs, Client};
use std::sync::Arc;
use tracing;

pub use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolArgs, ChatCompletionToolType, FunctionCall,
    FunctionObjectArgs,
};

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
/// Exposed for tests and for callers who need to log API keys safely.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 {
        "***".to_string()
    } else {
        let head_len = 7.min(len);
        let tail_len = 4.min(len.saturating_sub(head_len));
        let head = &token[..head_len];
        let tail = if tail_len > 0 {
            &token[len - tail_len..]
        } else {
            ""
        };
        format!("{}***{}", head, tail)
    }
}

/// First choice of a completion: optional text and the tool calls the model requested.
#[derive(Debug, Clone, Default)]
pub struct CompletionReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ChatCompletionMessageToolCall>,
}

/// OpenAI chat client. Wraps async-openai client; optionally holds API key for masked logging.
#[derive(Clone)]
pub struct OpenAIClient {
    /// Shared async-openai client used for all API calls.
    client: Arc<Client<async_openai::config::OpenAIConfig>>,
    /// API key stored only for logging (masked). None when created via `with_client()`.
    api_key_for_logging: Option<String>,
}

impl OpenAIClient {
    /// Builds a client using the given API key and default API base URL.
    pub fn new(api_key: String) -> Self {
        let api_key_for_logging = Some(api_key.clone());
        let config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        let client = Client::with_config(config);
        Self {
            client: Arc::new(client),
            api_key_for_logging,
        }
    }

    /// Builds a client with a custom base URL (e.g. Groq or a proxy).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let api_key_for_logging = Some(api_key.clone());
        let config = async_openai::config::OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        let client = Client::with_config(config);
        Self {
            client: Arc::new(client),
            api_key_for_logging,
        }
    }

    /// Builds a client from an existing async-openai client (no API key stored for logging).
    pub fn with_client(client: Client<async_openai::config::OpenAIConfig>) -> Self {
        Self {
            client: Arc::new(client),
            api_key_for_logging: None,
        }
    }

    /// Sends a chat completion request offering `tools` and returns the first choice.
    ///
    /// Logs masked API key, request JSON, and token usage. An empty `tools` list omits the
    /// `tools` field. Returns an error if the response has no choices.
    pub async fn chat_completion_with_tools(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
        tools: Vec<ChatCompletionTool>,
    ) -> anyhow::Result<CompletionReply> {
        let message_count = messages.len();
        let tool_count = tools.len();
        let masked = self
            .api_key_for_logging
            .as_deref()
            .map(mask_token)
            .unwrap_or_else(|| "***".to_string());

        tracing::info!(
            model = %model,
            message_count = message_count,
            tool_count = tool_count,
            api_key = %masked,
            "OpenAI chat_completion request"
        );

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(model).messages(messages);
        if !tools.is_empty() {
            builder.tools(tools);
        }
        let request = builder.build()?;

        if let Ok(json) = serde_json::to_string_pretty(&request) {
            tracing::debug!(request_json = %json, "OpenAI chat_completion request JSON");
        }

        let response = self.client.chat().create(request).await?;

        if let Some(ref u) = response.usage {
            tracing::info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "OpenAI chat_completion usage"
            );
        }

        match response.choices.into_iter().next() {
            Some(choice) => Ok(CompletionReply {
                content: choice.message.content,
                tool_calls: choice.message.tool_calls.unwrap_or_default(),
            }),
            None => anyhow::bail!("No response from OpenAI"),
        }
    }
}
