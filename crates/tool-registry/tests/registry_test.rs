//! Integration tests for [`tool_registry::ToolRegistry`].
//!
//! Covers: register/get round trip, duplicate and missing-secret rejection without partial
//! mutation, description-only edits, delete/history, persist-and-reload, default seeding and the
//! malformed-catalog decision. Uses a temp dir for the catalog file and a static secret resolver.

use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use tool_registry::{
    CatalogFile, RegistryError, SecretResolver, StaticSecretResolver, Tool, ToolRegistry,
    EDIT_WARNING,
};

fn resolver() -> Arc<dyn SecretResolver> {
    Arc::new(
        StaticSecretResolver::new()
            .with_secret("GOOGLE_API_KEY", "google-secret")
            .with_secret("WEATHER_API_KEY", "weather-secret")
            .with_unset("STOCKS_API_KEY"),
    )
}

fn catalog(dir: &TempDir) -> CatalogFile {
    CatalogFile::new(dir.path().join("tools_config.json"))
}

fn open(dir: &TempDir) -> ToolRegistry {
    ToolRegistry::open(resolver(), catalog(dir)).expect("open registry")
}

fn plain_params(field: &str) -> Value {
    json!({
        "type": "object",
        "properties": { field: { "type": "string" } },
        "required": [field]
    })
}

fn secret_params(key: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "symbol": { "type": "string" },
            "api_key": { "type": "env_var", "env_var_name": key }
        }
    })
}

fn file_contents(dir: &TempDir) -> String {
    std::fs::read_to_string(dir.path().join("tools_config.json")).unwrap()
}

/// **Test: Startup without a catalog file seeds search_web and weather and writes the file.**
#[test]
fn test_default_startup_seeds_two_tools() {
    let dir = tempfile::tempdir().unwrap();
    let registry = open(&dir);

    let tools = registry.list_all();
    let names: Vec<_> = tools.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["search_web", "weather"]);
    for tool in &tools {
        assert_eq!(tool.required_secrets().len(), 1);
    }
    assert!(dir.path().join("tools_config.json").exists());
}

/// **Test: Seeding works even when the default secrets are not configured.**
#[test]
fn test_default_startup_without_secrets() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ToolRegistry::open(Arc::new(StaticSecretResolver::new()), catalog(&dir)).unwrap();
    assert_eq!(registry.len(), 2);
}

/// **Test: register then get_by_name returns the same fields with created_at == last_modified.**
#[test]
fn test_register_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = open(&dir);

    let created = registry
        .create("calculate", "Evaluate an expression", plain_params("expression"))
        .unwrap();
    let fetched = registry.get_by_name("calculate").unwrap();

    assert_eq!(fetched.name(), "calculate");
    assert_eq!(fetched.description(), "Evaluate an expression");
    assert_eq!(fetched.parameters(), &plain_params("expression"));
    assert_eq!(fetched.created_at(), fetched.last_modified());
    assert_eq!(fetched, &created);
}

/// **Test: Duplicate names are rejected; registry and file stay unchanged.**
#[test]
fn test_duplicate_name_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = open(&dir);
    let before_file = file_contents(&dir);
    let before = registry.get_by_name("weather").unwrap().clone();

    let err = registry
        .create("weather", "Something else", plain_params("x"))
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateName(ref n) if n == "weather"));
    assert_eq!(registry.get_by_name("weather").unwrap(), &before);
    assert_eq!(registry.len(), 2);
    assert_eq!(file_contents(&dir), before_file);
}

/// **Test: Registering a tool whose secret is unset fails and leaves state unchanged.**
#[test]
fn test_register_missing_secret_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = open(&dir);
    let before_file = file_contents(&dir);

    let err = registry
        .register(Tool::new("stocks", "Stock quotes", secret_params("STOCKS_API_KEY")))
        .unwrap_err();
    match err {
        RegistryError::MissingSecret { tool, missing } => {
            assert_eq!(tool, "stocks");
            assert_eq!(missing, vec!["STOCKS_API_KEY"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(registry.get_by_name("stocks").is_none());
    assert_eq!(file_contents(&dir), before_file);

    // An undeclared key is just as unavailable.
    let err = registry
        .create("fx", "FX rates", secret_params("FX_API_KEY"))
        .unwrap_err();
    assert!(matches!(err, RegistryError::MissingSecret { .. }));
}

/// **Test: Editing parameters to require an unset secret fails without touching the tool.**
#[test]
fn test_edit_missing_secret_no_partial_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = open(&dir);
    let before = registry.get_by_name("search_web").unwrap().clone();
    let before_file = file_contents(&dir);

    let err = registry
        .edit(
            "search_web",
            Some("Changed description"),
            Some(secret_params("STOCKS_API_KEY")),
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::MissingSecret { .. }));
    assert_eq!(registry.get_by_name("search_web").unwrap(), &before);
    assert_eq!(file_contents(&dir), before_file);
}

/// **Test: Description-only edit keeps parameters and created_at, advances last_modified.**
#[test]
fn test_edit_description_only() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = open(&dir);
    let before = registry.get_by_name("weather").unwrap().clone();

    let outcome = registry
        .edit("weather", Some("Current weather and forecast"), None)
        .unwrap();

    assert_eq!(outcome.original, before);
    assert_eq!(outcome.warning, EDIT_WARNING);
    assert_eq!(outcome.updated.description(), "Current weather and forecast");
    assert_eq!(outcome.updated.parameters(), before.parameters());
    assert_eq!(outcome.updated.created_at(), before.created_at());
    assert!(outcome.updated.last_modified() > before.last_modified());
    assert_eq!(registry.get_by_name("weather").unwrap(), &outcome.updated);
}

/// **Test: Editing parameters with available secrets succeeds and is persisted.**
#[test]
fn test_edit_parameters_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = open(&dir);
    registry
        .edit("weather", None, Some(secret_params("WEATHER_API_KEY")))
        .unwrap();

    let reloaded = open(&dir);
    assert_eq!(
        reloaded.get_by_name("weather").unwrap().parameters(),
        &secret_params("WEATHER_API_KEY")
    );
}

#[test]
fn test_edit_unknown_tool() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = open(&dir);
    let err = registry.edit("nope", Some("x"), None).unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(ref n) if n == "nope"));
}

/// **Test: delete then get_by_name is None and history is NotFound.**
#[test]
fn test_delete_then_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = open(&dir);
    registry.delete("search_web").unwrap();

    assert!(registry.get_by_name("search_web").is_none());
    assert!(matches!(
        registry.history("search_web"),
        Err(RegistryError::NotFound(_))
    ));
    assert!(matches!(
        registry.delete("search_web"),
        Err(RegistryError::NotFound(_))
    ));
}

#[test]
fn test_history_reports_current_version() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = open(&dir);
    registry.edit("weather", Some("v2"), None).unwrap();

    let history = registry.history("weather").unwrap();
    let tool = registry.get_by_name("weather").unwrap();
    assert_eq!(history.name, "weather");
    assert_eq!(history.created_at, tool.created_at());
    assert_eq!(history.last_modified, tool.last_modified());
    assert_eq!(&history.current_version, tool);
}

/// **Test: After create/edit/delete, reloading from the file reproduces the same mapping.**
#[test]
fn test_persist_reload_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = open(&dir);
    registry
        .create("calculate", "Evaluate an expression", plain_params("expression"))
        .unwrap();
    registry
        .create("translate", "Translate text", plain_params("text"))
        .unwrap();
    registry.edit("calculate", Some("Math"), None).unwrap();
    registry.delete("weather").unwrap();

    let reloaded = open(&dir);
    assert_eq!(reloaded.list_all(), registry.list_all());
    let names: Vec<_> = reloaded.list_all().iter().map(|t| t.name().to_string()).collect();
    assert_eq!(names, vec!["search_web", "calculate", "translate"]);
}

/// **Test: An existing catalog file fully replaces the default seed set.**
#[test]
fn test_existing_file_replaces_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let only = Tool::new("calculate", "Math", plain_params("expression"));
    catalog(&dir).save(std::slice::from_ref(&only)).unwrap();

    let registry = open(&dir);
    assert_eq!(registry.list_all(), vec![only]);
}

/// **Test: A malformed catalog fails fast instead of falling back to defaults.**
#[test]
fn test_malformed_catalog_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tools_config.json"), "[{\"name\": 1}").unwrap();

    let result = ToolRegistry::open(resolver(), catalog(&dir));
    assert!(matches!(result, Err(RegistryError::MalformedCatalog { .. })));
    assert_eq!(file_contents(&dir), "[{\"name\": 1}");
}
