//! In-memory tool registry mirrored to a [`CatalogFile`].
//!
//! Invariants:
//! - tool names are unique;
//! - a tool enters or is edited in the registry only if every required secret is available;
//! - after every successful mutation the catalog file holds exactly the in-memory state.
//!
//! A mutation whose save fails is rolled back in memory and returns the persistence error.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::catalog_file::CatalogFile;
use crate::error::{RegistryError, Result};
use crate::secret::SecretResolver;
use crate::tool::{is_empty_schema, Tool};

/// Advisory returned with every successful edit.
pub const EDIT_WARNING: &str = "Warning: Editing existing tools may affect their functionality. Make sure to test the tool after modification.";

/// Result of [`ToolRegistry::edit`].
#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub updated: Tool,
    /// Snapshot taken before the mutation.
    pub original: Tool,
    pub warning: &'static str,
}

/// Creation and modification times plus the current version of a tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolHistory {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub current_version: Tool,
}

/// Authoritative tool set. Order of iteration is insertion order.
pub struct ToolRegistry {
    tools: Vec<Tool>,
    resolver: Arc<dyn SecretResolver>,
    catalog: CatalogFile,
}

impl ToolRegistry {
    /// Loads the catalog file, or seeds [`default_tools`] and writes the file when it is absent.
    /// A present but malformed file is an error.
    #[instrument(skip(resolver, catalog), fields(path = %catalog.path().display()))]
    pub fn open(resolver: Arc<dyn SecretResolver>, catalog: CatalogFile) -> Result<Self> {
        let mut registry = Self {
            tools: Vec::new(),
            resolver,
            catalog,
        };
        match registry.catalog.load()? {
            Some(tools) => {
                registry.tools = dedup_by_name(tools);
            }
            None => {
                registry.tools = default_tools();
                for tool in &registry.tools {
                    let missing = tool.missing_secrets(registry.resolver.as_ref());
                    if !missing.is_empty() {
                        warn!(
                            tool = %tool.name(),
                            missing = ?missing,
                            "Default tool seeded without configured secrets"
                        );
                    }
                }
                registry.catalog.save(&registry.tools)?;
                info!(tool_count = registry.tools.len(), "Seeded default tools");
            }
        }
        Ok(registry)
    }

    /// Empty registry; nothing is read from or written to disk until the first mutation.
    pub fn empty(resolver: Arc<dyn SecretResolver>, catalog: CatalogFile) -> Self {
        Self {
            tools: Vec::new(),
            resolver,
            catalog,
        }
    }

    pub fn resolver(&self) -> &Arc<dyn SecretResolver> {
        &self.resolver
    }

    pub fn catalog(&self) -> &CatalogFile {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Inserts `tool` after the uniqueness and secret checks, then persists.
    #[instrument(skip(self, tool), fields(tool = %tool.name()))]
    pub fn register(&mut self, tool: Tool) -> Result<()> {
        if self.position(tool.name()).is_some() {
            return Err(RegistryError::DuplicateName(tool.name().to_string()));
        }
        self.ensure_secrets(&tool)?;

        self.tools.push(tool);
        if let Err(e) = self.catalog.save(&self.tools) {
            self.tools.pop();
            return Err(e);
        }
        info!("Tool registered");
        Ok(())
    }

    /// Builds a fresh tool and registers it.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Result<Tool> {
        let tool = Tool::new(name, description, parameters);
        self.register(tool.clone())?;
        Ok(tool)
    }

    /// Updates description and/or parameters of an existing tool.
    ///
    /// New parameters are validated on a scratch copy first; the stored tool is untouched on failure.
    #[instrument(skip(self, description, parameters))]
    pub fn edit(
        &mut self,
        name: &str,
        description: Option<&str>,
        parameters: Option<Value>,
    ) -> Result<EditOutcome> {
        let index = self
            .position(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        let original = self.tools[index].clone();

        let validate = parameters.as_ref().is_some_and(|p| !is_empty_schema(p));
        let mut candidate = original.clone();
        candidate.update(description, parameters);
        if validate {
            self.ensure_secrets(&candidate)?;
        }

        self.tools[index] = candidate;
        if let Err(e) = self.catalog.save(&self.tools) {
            self.tools[index] = original;
            return Err(e);
        }
        info!("Tool edited");
        Ok(EditOutcome {
            updated: self.tools[index].clone(),
            original,
            warning: EDIT_WARNING,
        })
    }

    /// Removes a tool and persists.
    #[instrument(skip(self))]
    pub fn delete(&mut self, name: &str) -> Result<Tool> {
        let index = self
            .position(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        let removed = self.tools.remove(index);
        if let Err(e) = self.catalog.save(&self.tools) {
            self.tools.insert(index, removed);
            return Err(e);
        }
        info!("Tool deleted");
        Ok(removed)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Current timestamps and version; no intermediate edits are retained.
    pub fn history(&self, name: &str) -> Result<ToolHistory> {
        let tool = self
            .get_by_name(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        Ok(ToolHistory {
            name: tool.name().to_string(),
            created_at: tool.created_at(),
            last_modified: tool.last_modified(),
            current_version: tool.clone(),
        })
    }

    pub fn list_all(&self) -> Vec<Tool> {
        self.tools.clone()
    }

    /// Declared secret keys with their current values. Only the tool executor should see values.
    pub fn available_secret_values(&self) -> BTreeMap<String, Option<String>> {
        self.resolver.all_values()
    }

    /// Declared secret keys with availability flags; safe to show to the model or users.
    pub fn secret_availability(&self) -> BTreeMap<String, bool> {
        self.resolver
            .declared_keys()
            .into_iter()
            .map(|key| {
                let available = self.resolver.is_available(&key);
                (key, available)
            })
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.tools.iter().position(|t| t.name() == name)
    }

    fn ensure_secrets(&self, tool: &Tool) -> Result<()> {
        let missing = tool.missing_secrets(self.resolver.as_ref());
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::MissingSecret {
                tool: tool.name().to_string(),
                missing,
            })
        }
    }
}

// Later entries with an already-seen name are dropped so a hand-edited file cannot break uniqueness.
fn dedup_by_name(tools: Vec<Tool>) -> Vec<Tool> {
    let mut out: Vec<Tool> = Vec::with_capacity(tools.len());
    for tool in tools {
        if out.iter().any(|t| t.name() == tool.name()) {
            warn!(tool = %tool.name(), "Duplicate tool in catalog file ignored");
            continue;
        }
        out.push(tool);
    }
    out
}

/// The two tools seeded when no catalog file exists.
pub fn default_tools() -> Vec<Tool> {
    vec![
        Tool::new(
            "search_web",
            "Search the web for information",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    },
                    "api_key": {
                        "type": "env_var",
                        "description": "Google Search API Key",
                        "env_var_name": "GOOGLE_API_KEY"
                    }
                },
                "required": ["query", "api_key"]
            }),
        ),
        Tool::new(
            "weather",
            "Get weather information for a location",
            json!({
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "The location to get weather for"
                    },
                    "api_key": {
                        "type": "env_var",
                        "description": "OpenWeather API Key",
                        "env_var_name": "WEATHER_API_KEY"
                    }
                },
                "required": ["location", "api_key"]
            }),
        ),
    ]
}
