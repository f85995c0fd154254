//! Registry self-modification commands the model can call.
//!
//! The four commands are offered to the model as function tools next to the registry's own
//! tools. Arguments are decoded into typed structs and validated before they reach the registry;
//! every outcome, success or failure, is rendered as the text that goes back into the transcript.

use llm_client::ToolDefinition;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tool_registry::ToolRegistry;
use tracing::info;

pub const CREATE_TOOL: &str = "create_tool";
pub const EDIT_TOOL: &str = "edit_tool";
pub const DELETE_TOOL: &str = "delete_tool";
pub const GET_TOOL_HISTORY: &str = "get_tool_history";

/// Names the registry may not use for its own tools.
pub const COMMAND_NAMES: [&str; 4] = [CREATE_TOOL, EDIT_TOOL, DELETE_TOOL, GET_TOOL_HISTORY];

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("tool name must not be empty")]
    EmptyName,

    #[error("tool name '{0}' is reserved")]
    ReservedName(String),

    #[error("parameters must be a JSON object")]
    ParametersNotObject,
}

#[derive(Debug, Deserialize)]
struct CreateArgs {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct EditArgs {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct NameArgs {
    name: String,
}

/// A validated registry command.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryCommand {
    Create {
        name: String,
        description: String,
        parameters: Value,
    },
    Edit {
        name: String,
        description: Option<String>,
        parameters: Option<Value>,
    },
    Delete {
        name: String,
    },
    History {
        name: String,
    },
}

fn decode<T: for<'de> Deserialize<'de>>(arguments: &str) -> Result<T, CommandError> {
    let raw = if arguments.trim().is_empty() {
        "{}"
    } else {
        arguments
    };
    serde_json::from_str(raw).map_err(|e| CommandError::InvalidArguments(e.to_string()))
}

fn non_empty(name: String) -> Result<String, CommandError> {
    if name.trim().is_empty() {
        Err(CommandError::EmptyName)
    } else {
        Ok(name)
    }
}

impl RegistryCommand {
    /// True if `name` is one of the four command names.
    pub fn is_command(name: &str) -> bool {
        COMMAND_NAMES.contains(&name)
    }

    /// Decodes and validates the raw JSON `arguments` of command `name`.
    ///
    /// Returns `None` when `name` is not a command.
    pub fn parse(name: &str, arguments: &str) -> Option<Result<Self, CommandError>> {
        let parsed = match name {
            CREATE_TOOL => decode::<CreateArgs>(arguments).and_then(|args| {
                let name = non_empty(args.name)?;
                if Self::is_command(&name) {
                    return Err(CommandError::ReservedName(name));
                }
                if !args.parameters.is_object() {
                    return Err(CommandError::ParametersNotObject);
                }
                Ok(Self::Create {
                    name,
                    description: args.description,
                    parameters: args.parameters,
                })
            }),
            EDIT_TOOL => decode::<EditArgs>(arguments).and_then(|args| {
                let parameters = args.parameters.filter(|p| !p.is_null());
                if parameters.as_ref().is_some_and(|p| !p.is_object()) {
                    return Err(CommandError::ParametersNotObject);
                }
                Ok(Self::Edit {
                    name: non_empty(args.name)?,
                    description: args.description,
                    parameters,
                })
            }),
            DELETE_TOOL => decode::<NameArgs>(arguments).and_then(|args| {
                Ok(Self::Delete {
                    name: non_empty(args.name)?,
                })
            }),
            GET_TOOL_HISTORY => decode::<NameArgs>(arguments).and_then(|args| {
                Ok(Self::History {
                    name: non_empty(args.name)?,
                })
            }),
            _ => return None,
        };
        Some(parsed)
    }

    /// Runs the command against `registry` and renders the transcript text.
    pub fn execute(self, registry: &mut ToolRegistry) -> String {
        match self {
            Self::Create {
                name,
                description,
                parameters,
            } => match registry.create(&name, &description, parameters) {
                Ok(tool) => {
                    info!(tool = %name, "step: tool created by model");
                    format!("Successfully created tool: {}", to_json(&tool))
                }
                Err(e) => format!("Error creating tool: {}", e),
            },
            Self::Edit {
                name,
                description,
                parameters,
            } => match registry.edit(&name, description.as_deref(), parameters) {
                Ok(outcome) => {
                    info!(tool = %name, "step: tool edited by model");
                    format!(
                        "Tool edited successfully. {}\nOriginal: {}\nUpdated: {}",
                        outcome.warning,
                        to_json(&outcome.original),
                        to_json(&outcome.updated)
                    )
                }
                Err(e) => format!("Error editing tool: {}", e),
            },
            Self::Delete { name } => match registry.delete(&name) {
                Ok(_) => {
                    info!(tool = %name, "step: tool deleted by model");
                    format!("Successfully deleted tool: {}", name)
                }
                Err(e) => format!("Error deleting tool: {}", e),
            },
            Self::History { name } => match registry.history(&name) {
                Ok(history) => format!(
                    "Tool history: {}",
                    serde_json::to_string_pretty(&history).unwrap_or_default()
                ),
                Err(e) => format!("Error getting tool history: {}", e),
            },
        }
    }

    /// Error text for a command whose arguments failed validation.
    pub fn error_text(name: &str, error: &CommandError) -> String {
        let action = match name {
            CREATE_TOOL => "creating tool",
            EDIT_TOOL => "editing tool",
            DELETE_TOOL => "deleting tool",
            _ => "getting tool history",
        };
        format!("Error {}: {}", action, error)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn name_property() -> Value {
    json!({ "type": "string", "description": "Unique tool name" })
}

/// Function tool definitions for the four commands.
pub fn command_definitions() -> Vec<ToolDefinition> {
    let parameters_property = json!({
        "type": "object",
        "description": "JSON schema of the tool parameters. Use {\"type\": \"env_var\", \"env_var_name\": \"KEY\"} for secrets."
    });
    vec![
        ToolDefinition {
            name: CREATE_TOOL.to_string(),
            description: "Create a new tool with a name, description and parameter schema".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": name_property(),
                    "description": { "type": "string", "description": "What the tool does" },
                    "parameters": parameters_property
                },
                "required": ["name", "description", "parameters"]
            }),
        },
        ToolDefinition {
            name: EDIT_TOOL.to_string(),
            description: "Edit the description and/or parameter schema of an existing tool".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": name_property(),
                    "description": { "type": "string", "description": "New description" },
                    "parameters": parameters_property
                },
                "required": ["name"]
            }),
        },
        ToolDefinition {
            name: DELETE_TOOL.to_string(),
            description: "Delete an existing tool".to_string(),
            parameters: json!({
                "type": "object",
                "properties": { "name": name_property() },
                "required": ["name"]
            }),
        },
        ToolDefinition {
            name: GET_TOOL_HISTORY.to_string(),
            description: "Show creation and modification times and the current version of a tool".to_string(),
            parameters: json!({
                "type": "object",
                "properties": { "name": name_property() },
                "required": ["name"]
            }),
        },
    ]
}
