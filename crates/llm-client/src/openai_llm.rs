//! OpenAI-compatible LlmClient: wraps openai-client and converts transcript and tool types.

use anyhow::Result;
use async_trait::async_trait;
use prompt::ChatMessage;
use tracing::instrument;

use super::{
    chat_message_to_openai, tool_call_from_openai, tool_definition_to_openai, LlmClient,
    LlmReply, ToolDefinition,
};
use crate::config::{LlmConfig, DEFAULT_MODEL};

/// LlmClient backed by [`openai_client::OpenAIClient`]. The caller supplies the system prompt
/// as the first transcript message.
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: openai_client::OpenAIClient,
    model: String,
}

impl OpenAILlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::new(api_key),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: openai_client::OpenAIClient::with_base_url(api_key, base_url),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Builds from any [`LlmConfig`] (key, base URL, model).
    pub fn from_config(config: &dyn LlmConfig) -> Self {
        Self::with_base_url(config.api_key().to_string(), config.base_url().to_string())
            .with_model(config.model().to_string())
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages, tools), fields(model = %self.model))]
    async fn complete_with_tools(
        &self,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
    ) -> Result<LlmReply> {
        let openai_messages = messages
            .iter()
            .map(chat_message_to_openai)
            .collect::<Result<Vec<_>>>()?;
        let openai_tools = tools
            .iter()
            .map(tool_definition_to_openai)
            .collect::<Result<Vec<_>>>()?;
        let reply = self
            .client
            .chat_completion_with_tools(&self.model, openai_messages, openai_tools)
            .await?;
        Ok(LlmReply {
            content: reply.content,
            tool_calls: reply
                .tool_calls
                .into_iter()
                .map(tool_call_from_openai)
                .collect(),
        })
    }
}
