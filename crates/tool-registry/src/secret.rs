//! Secret resolution for tool parameters.
//!
//! A tool declares logical secret keys (e.g. `GOOGLE_API_KEY`) in its schema. The secrets
//! declaration file maps each logical key to the name of the environment variable that holds
//! the real value. [`SecretResolver`] answers availability questions without handing values to
//! anyone but the tool executor; values are read from the live environment on every call.

use std::collections::BTreeMap;
use std::env;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{RegistryError, Result};

/// Maps logical secret keys to environment variable names and values.
///
/// Implementations must not cache values; only the key → name mapping is fixed.
pub trait SecretResolver: Send + Sync {
    /// Environment variable name declared for `key`, if any.
    fn resolve_name(&self, key: &str) -> Option<String>;

    /// Current value of the variable behind `key`. `None` when the key is undeclared or the variable is unset.
    fn resolve_value(&self, key: &str) -> Option<String>;

    /// All declared logical keys, sorted.
    fn declared_keys(&self) -> Vec<String>;

    /// True iff `resolve_value` yields a non-empty string.
    fn is_available(&self, key: &str) -> bool {
        self.resolve_value(key).is_some_and(|v| !v.is_empty())
    }

    /// Snapshot of every declared key and its current value.
    fn all_values(&self) -> BTreeMap<String, Option<String>> {
        self.declared_keys()
            .into_iter()
            .map(|key| {
                let value = self.resolve_value(&key);
                (key, value)
            })
            .collect()
    }

    /// Declared keys whose name starts with the upper-cased tool name, with their values.
    fn tool_config(&self, tool_name: &str) -> BTreeMap<String, Option<String>> {
        let prefix = tool_name.to_uppercase();
        self.declared_keys()
            .into_iter()
            .filter(|key| key.starts_with(&prefix))
            .map(|key| {
                let value = self.resolve_value(&key);
                (key, value)
            })
            .collect()
    }
}

/// Resolver backed by the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretResolver {
    names: BTreeMap<String, String>,
}

impl EnvSecretResolver {
    /// Builds a resolver from explicit `(logical key, env var name)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Loads the declaration file (`KEY=VALUE` per line, `#` comments and blank lines skipped).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let iter = dotenvy::from_path_iter(path).map_err(|e| {
            RegistryError::SecretsDeclaration(format!("{}: {}", path.display(), e))
        })?;

        let mut names = BTreeMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e| {
                RegistryError::SecretsDeclaration(format!("{}: {}", path.display(), e))
            })?;
            debug!(key = %key, env_var = %value, "Declared tool secret");
            names.insert(key.trim().to_string(), value.trim().to_string());
        }

        info!(
            path = %path.display(),
            declared = names.len(),
            "Loaded secrets declaration"
        );
        Ok(Self { names })
    }

    /// Number of declared keys.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl SecretResolver for EnvSecretResolver {
    fn resolve_name(&self, key: &str) -> Option<String> {
        self.names.get(key).cloned()
    }

    fn resolve_value(&self, key: &str) -> Option<String> {
        let name = self.names.get(key)?;
        env::var(name).ok()
    }

    fn declared_keys(&self) -> Vec<String> {
        self.names.keys().cloned().collect()
    }
}

/// In-process resolver with fixed values; for tests and offline tooling.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretResolver {
    values: BTreeMap<String, Option<String>>,
}

impl StaticSecretResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `key` with a value.
    pub fn with_secret(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), Some(value.into()));
        self
    }

    /// Declares `key` without a value (not configured).
    pub fn with_unset(mut self, key: impl Into<String>) -> Self {
        self.values.insert(key.into(), None);
        self
    }
}

impl SecretResolver for StaticSecretResolver {
    fn resolve_name(&self, key: &str) -> Option<String> {
        self.values.contains_key(key).then(|| key.to_string())
    }

    fn resolve_value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned().flatten()
    }

    fn declared_keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_from_file_skips_comments_and_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# tool keys").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "GOOGLE_API_KEY=DBOT_TEST_GOOGLE").unwrap();
        writeln!(file, "WEATHER_API_KEY=DBOT_TEST_WEATHER").unwrap();
        file.flush().unwrap();

        let resolver = EnvSecretResolver::from_file(file.path()).unwrap();
        assert_eq!(resolver.len(), 2);
        assert_eq!(
            resolver.resolve_name("GOOGLE_API_KEY").as_deref(),
            Some("DBOT_TEST_GOOGLE")
        );
        assert_eq!(
            resolver.resolve_name("WEATHER_API_KEY").as_deref(),
            Some("DBOT_TEST_WEATHER")
        );
        assert!(resolver.resolve_name("UNKNOWN").is_none());
    }

    #[test]
    fn test_from_file_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = EnvSecretResolver::from_file(dir.path().join("nope.env"));
        assert!(matches!(result, Err(RegistryError::SecretsDeclaration(_))));
    }

    /// **Test: values are re-read from the environment on every call (no caching).**
    #[test]
    #[serial]
    fn test_resolve_value_reads_live_environment() {
        let resolver = EnvSecretResolver::from_pairs([("SEARCH_KEY", "DBOT_TEST_LIVE_SECRET")]);
        env::remove_var("DBOT_TEST_LIVE_SECRET");
        assert!(!resolver.is_available("SEARCH_KEY"));

        env::set_var("DBOT_TEST_LIVE_SECRET", "abc");
        assert_eq!(resolver.resolve_value("SEARCH_KEY").as_deref(), Some("abc"));
        assert!(resolver.is_available("SEARCH_KEY"));

        env::set_var("DBOT_TEST_LIVE_SECRET", "");
        assert!(!resolver.is_available("SEARCH_KEY"));
        env::remove_var("DBOT_TEST_LIVE_SECRET");
    }

    #[test]
    fn test_all_values_and_tool_config() {
        let resolver = StaticSecretResolver::new()
            .with_secret("WEATHER_API_KEY", "w")
            .with_unset("WEATHER_UNITS")
            .with_secret("GOOGLE_API_KEY", "g");

        let all = resolver.all_values();
        assert_eq!(all.len(), 3);
        assert_eq!(all["GOOGLE_API_KEY"].as_deref(), Some("g"));
        assert_eq!(all["WEATHER_UNITS"], None);

        let weather = resolver.tool_config("weather");
        assert_eq!(weather.len(), 2);
        assert!(weather.contains_key("WEATHER_API_KEY"));
        assert!(!weather.contains_key("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_undeclared_key_is_unavailable() {
        let resolver = StaticSecretResolver::new();
        assert!(resolver.resolve_name("X").is_none());
        assert!(resolver.resolve_value("X").is_none());
        assert!(!resolver.is_available("X"));
    }
}
