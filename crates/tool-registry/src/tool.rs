//! Tool entity: identity, description, JSON parameter schema, timestamps.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::secret::SecretResolver;

/// Parameter `type` that marks a field as an environment-secret reference.
pub const ENV_VAR_TYPE: &str = "env_var";

/// Field of an `env_var` parameter carrying the logical secret key.
pub const ENV_VAR_NAME_FIELD: &str = "env_var_name";

/// A callable tool as stored in the catalog.
///
/// `name` and `created_at` never change after construction; [`Tool::update`] is the only mutator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    name: String,
    description: String,
    parameters: Value,
    created_at: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

impl Tool {
    /// New tool with `created_at == last_modified == now`.
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            created_at: now,
            last_modified: now,
        }
    }

    /// Rebuilds a tool with stored timestamps (catalog load).
    pub fn with_timestamps(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        created_at: DateTime<Utc>,
        last_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            created_at,
            last_modified,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &Value {
        &self.parameters
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Logical secret keys declared by `env_var` properties. Duplicates collapse.
    pub fn required_secrets(&self) -> BTreeSet<String> {
        required_secrets_of(&self.parameters)
    }

    /// Availability of each required secret.
    pub fn check_secrets(&self, resolver: &dyn SecretResolver) -> BTreeMap<String, bool> {
        self.required_secrets()
            .into_iter()
            .map(|key| {
                let available = resolver.is_available(&key);
                (key, available)
            })
            .collect()
    }

    /// Required secrets the resolver cannot supply, sorted.
    pub fn missing_secrets(&self, resolver: &dyn SecretResolver) -> Vec<String> {
        self.check_secrets(resolver)
            .into_iter()
            .filter(|(_, available)| !available)
            .map(|(key, _)| key)
            .collect()
    }

    /// Replaces description and/or parameters when given a non-empty value, then refreshes
    /// `last_modified` (even if nothing changed).
    pub fn update(&mut self, description: Option<&str>, parameters: Option<Value>) {
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            self.description = description.to_string();
        }
        if let Some(parameters) = parameters.filter(|p| !is_empty_schema(p)) {
            self.parameters = parameters;
        }
        self.touch();
    }

    // last_modified is strictly increasing even when the clock does not advance between calls.
    fn touch(&mut self) {
        let floor = self.last_modified + Duration::nanoseconds(1);
        self.last_modified = Utc::now().max(floor);
    }
}

/// Collects `env_var_name` of every `env_var` entry under `properties`.
pub fn required_secrets_of(parameters: &Value) -> BTreeSet<String> {
    parameters
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .values()
                .filter(|p| p.get("type").and_then(Value::as_str) == Some(ENV_VAR_TYPE))
                .filter_map(|p| p.get(ENV_VAR_NAME_FIELD).and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// `null` or `{}` mean "leave unchanged" in an edit.
pub fn is_empty_schema(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
