//! # Prompt
//!
//! Chat transcript types and the agent's system prompt.
//!
//! ## Format
//!
//! The system prompt is built in fixed sections:
//!
//! - **Preamble**: assistant role line
//! - **User memories** (optional): `- {key}: {value}` per fact
//! - **Available tools** (optional): name, description, pretty JSON parameters, created / last modified
//! - **Environment variables** (optional): `- {key}: [Available]` or `[Not configured]`; values never appear
//! - **Tool management**: the four registry commands and the `env_var` parameter convention
//!
//! ## External interactions
//!
//! - **AI models**: Output is sent to the chat-completions API (Groq / OpenAI compatible).

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`), possibly carrying tool calls.
    Assistant,
    /// Result of a tool call (API `role: "tool"`).
    Tool,
}

/// A function call requested by the model. `arguments` is the raw JSON string from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    /// Set on assistant messages that requested tools.
    pub tool_calls: Vec<ToolCall>,
    /// Set on tool messages: id of the call this result answers.
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    fn plain(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(MessageRole::Assistant, content)
    }

    /// Assistant turn that only requests tools (no text content).
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: String::new(),
            tool_calls,
            tool_call_id: None,
        }
    }

    /// Tool result answering `tool_call_id`.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// Preamble of every agent system prompt.
pub const AGENT_PREAMBLE: &str = "You are an AI assistant with access to user memories and tools.";

/// Section title for stored user facts.
pub const SECTION_MEMORIES: &str = "User memories:";

/// Section title for the tool catalog.
pub const SECTION_TOOLS: &str = "Available tools:";

/// Section title for secret availability.
pub const SECTION_ENV: &str = "Available environment variables for tools:";

/// Instructions for the registry commands and the `env_var` convention.
pub const TOOL_MANAGEMENT_INSTRUCTIONS: &str = "You can create new tools or edit existing ones using the following commands:
- To create a new tool: Use the 'create_tool' command with name, description, and parameters
- To edit a tool: Use the 'edit_tool' command with the tool name and new description/parameters
- To delete a tool: Use the 'delete_tool' command with the tool name
- To view tool history: Use the 'get_tool_history' command with the tool name

When creating or editing tools, you can use environment variables by setting parameter type to 'env_var' and specifying the env_var_name.
Example parameter for using an environment variable:
{
  \"type\": \"env_var\",
  \"description\": \"API Key for the service\",
  \"env_var_name\": \"SERVICE_API_KEY\"
}";

/// One catalog entry as shown to the model. Fields are pre-rendered by the caller.
#[derive(Debug, Clone)]
pub struct ToolPromptEntry {
    pub name: String,
    pub description: String,
    /// Pretty-printed JSON schema.
    pub parameters: String,
    pub created_at: String,
    pub last_modified: String,
}

/// Builds the agent system prompt from memories, tool catalog and secret availability.
///
/// Empty inputs omit their section. Secret values are never accepted, only availability flags.
pub fn format_agent_system_prompt<M, K, V, S, SK>(
    memories: M,
    tools: &[ToolPromptEntry],
    secrets: S,
) -> String
where
    M: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
    S: IntoIterator<Item = (SK, bool)>,
    SK: AsRef<str>,
{
    let mut out = String::new();
    out.push_str(AGENT_PREAMBLE);
    out.push_str("\n\n");

    let memories: Vec<(K, V)> = memories.into_iter().collect();
    if !memories.is_empty() {
        out.push_str(SECTION_MEMORIES);
        out.push('\n');
        for (key, value) in &memories {
            out.push_str(&format!("- {}: {}\n", key.as_ref(), value.as_ref()));
        }
    }

    if !tools.is_empty() {
        out.push('\n');
        out.push_str(SECTION_TOOLS);
        out.push('\n');
        for tool in tools {
            out.push_str(&format!("- {}: {}\n", tool.name, tool.description));
            out.push_str(&format!("  Parameters: {}\n", tool.parameters));
            out.push_str(&format!("  Created: {}\n", tool.created_at));
            out.push_str(&format!("  Last Modified: {}\n", tool.last_modified));
        }
    }

    let secrets: Vec<(SK, bool)> = secrets.into_iter().collect();
    if !secrets.is_empty() {
        out.push('\n');
        out.push_str(SECTION_ENV);
        out.push('\n');
        for (key, available) in &secrets {
            let status = if *available {
                "[Available]"
            } else {
                "[Not configured]"
            };
            out.push_str(&format!("- {}: {}\n", key.as_ref(), status));
        }
    }

    out.push('\n');
    out.push_str(TOOL_MANAGEMENT_INSTRUCTIONS);
    out
}
