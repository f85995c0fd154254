//! Views of the registry for the model: function tool definitions and system-prompt entries.

use llm_client::ToolDefinition;
use prompt::ToolPromptEntry;
use serde_json::Value;
use tool_registry::{Tool, ENV_VAR_TYPE};
use tracing::warn;

use crate::command::{command_definitions, RegistryCommand};

/// Removes `env_var` properties (and their `required` entries) from a schema.
///
/// Secrets are injected by the executor, so the model is never asked to supply them.
pub fn model_facing_schema(parameters: &Value) -> Value {
    let mut schema = parameters.clone();
    let Some(obj) = schema.as_object_mut() else {
        return schema;
    };
    let mut hidden: Vec<String> = Vec::new();
    if let Some(props) = obj.get_mut("properties").and_then(Value::as_object_mut) {
        hidden = props
            .iter()
            .filter(|(_, p)| p.get("type").and_then(Value::as_str) == Some(ENV_VAR_TYPE))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &hidden {
            props.remove(key);
        }
    }
    if let Some(required) = obj.get_mut("required").and_then(Value::as_array_mut) {
        required.retain(|r| r.as_str().map_or(true, |s| !hidden.iter().any(|h| h == s)));
    }
    obj.entry("type").or_insert_with(|| Value::String("object".to_string()));
    schema
}

/// The four registry commands followed by every registry tool, in insertion order.
pub fn tool_definitions(tools: &[Tool]) -> Vec<ToolDefinition> {
    let mut defs = command_definitions();
    for tool in tools {
        if RegistryCommand::is_command(tool.name()) {
            warn!(tool = %tool.name(), "Registry tool shadows a command name, not offered");
            continue;
        }
        defs.push(ToolDefinition {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: model_facing_schema(tool.parameters()),
        });
    }
    defs
}

/// Catalog entries for the system prompt; parameters are shown in full, pretty-printed.
pub fn prompt_entries(tools: &[Tool]) -> Vec<ToolPromptEntry> {
    tools
        .iter()
        .map(|tool| ToolPromptEntry {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: serde_json::to_string_pretty(tool.parameters()).unwrap_or_default(),
            created_at: tool.created_at().to_rfc3339(),
            last_modified: tool.last_modified().to_rfc3339(),
        })
        .collect()
}
