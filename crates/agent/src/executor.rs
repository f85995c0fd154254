//! Tool execution: registry commands, built-in handlers and secret injection.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use prompt::ToolCall;
use serde_json::Value;
use tool_registry::ToolRegistry;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::command::RegistryCommand;

/// Registry shared between the agent, chat handlers and the CLI.
pub type SharedRegistry = Arc<Mutex<ToolRegistry>>;

pub const NOT_IMPLEMENTED: &str = "Tool execution not implemented";

/// Arguments and resolved secrets for one call of a registry tool.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: Value,
    /// Logical secret key to current value. Never logged and never put into the transcript.
    pub secrets: BTreeMap<String, String>,
}

impl ToolInvocation {
    /// String argument `key`; non-string values are rendered as JSON, missing ones as empty.
    pub fn arg_text(&self, key: &str) -> String {
        match self.arguments.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

/// Executes a registered tool and returns the text for the transcript.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, invocation: &ToolInvocation) -> String;
}

/// Placeholder for `search_web`: echoes the query.
pub struct SearchWebPlaceholder;

#[async_trait]
impl ToolHandler for SearchWebPlaceholder {
    async fn call(&self, invocation: &ToolInvocation) -> String {
        format!("Searching web for: {}", invocation.arg_text("query"))
    }
}

/// Placeholder for `calculate`: echoes the expression.
pub struct CalculatePlaceholder;

#[async_trait]
impl ToolHandler for CalculatePlaceholder {
    async fn call(&self, invocation: &ToolInvocation) -> String {
        format!("Calculating: {}", invocation.arg_text("expression"))
    }
}

/// Dispatches model tool calls.
///
/// Order: registry commands, then registry lookup (`Tool {name} not found`), then the secret
/// check, then a handler registered under the tool's name (`Tool execution not implemented`
/// when none).
#[derive(Clone)]
pub struct ToolExecutor {
    registry: SharedRegistry,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolExecutor {
    /// Executor with the `search_web` and `calculate` placeholders.
    pub fn new(registry: SharedRegistry) -> Self {
        Self::without_handlers(registry)
            .with_handler("search_web", Arc::new(SearchWebPlaceholder))
            .with_handler("calculate", Arc::new(CalculatePlaceholder))
    }

    pub fn without_handlers(registry: SharedRegistry) -> Self {
        Self {
            registry,
            handlers: HashMap::new(),
        }
    }

    pub fn with_handler(mut self, name: impl Into<String>, handler: Arc<dyn ToolHandler>) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Runs `call` and returns the tool result text. Never fails: errors become text.
    #[instrument(skip(self, call), fields(tool = %call.name, call_id = %call.id))]
    pub async fn execute(&self, call: &ToolCall) -> String {
        if let Some(parsed) = RegistryCommand::parse(&call.name, &call.arguments) {
            return match parsed {
                Ok(command) => {
                    let mut registry = self.registry.lock().await;
                    command.execute(&mut registry)
                }
                Err(e) => {
                    warn!(error = %e, "Registry command rejected");
                    RegistryCommand::error_text(&call.name, &e)
                }
            };
        }

        let invocation = {
            let registry = self.registry.lock().await;
            let Some(tool) = registry.get_by_name(&call.name) else {
                info!("Tool not found");
                return format!("Tool {} not found", call.name);
            };
            let resolver = registry.resolver();
            let secrets = tool
                .required_secrets()
                .into_iter()
                .filter_map(|key| resolver.resolve_value(&key).map(|value| (key, value)))
                .collect();
            let arguments = match parse_arguments(&call.arguments) {
                Ok(v) => v,
                Err(e) => return format!("Invalid arguments for tool {}: {}", call.name, e),
            };
            ToolInvocation {
                name: call.name.clone(),
                arguments,
                secrets,
            }
        };

        match self.handlers.get(&call.name) {
            Some(handler) => {
                debug!(secret_count = invocation.secrets.len(), "step: running tool handler");
                handler.call(&invocation).await
            }
            None => NOT_IMPLEMENTED.to_string(),
        }
    }
}

fn parse_arguments(arguments: &str) -> Result<Value, serde_json::Error> {
    if arguments.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(arguments)
}
