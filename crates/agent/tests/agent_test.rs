//! Integration tests for [`agent::AgentOrchestrator`].
//!
//! A scripted [`LlmClient`] replays canned replies and records every request; the registry is
//! backed by a temp-dir catalog file and memory by the in-memory document store.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};

use agent::{AgentOrchestrator, SharedRegistry, MAX_ITERATIONS_REPLY, NOT_IMPLEMENTED};
use anyhow::Result;
use async_trait::async_trait;
use llm_client::{LlmClient, LlmReply, ToolDefinition};
use memory::UserMemory;
use memory_inmemory::InMemoryDocumentStore;
use prompt::{ChatMessage, MessageRole};
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tool_registry::{CatalogFile, StaticSecretResolver, ToolRegistry};

type Request = (Vec<ChatMessage>, Vec<ToolDefinition>);

/// Replays `script` in order, then repeats `fallback` (or fails when there is none).
struct ScriptedLlm {
    script: StdMutex<VecDeque<LlmReply>>,
    fallback: Option<LlmReply>,
    requests: StdMutex<Vec<Request>>,
}

impl ScriptedLlm {
    fn new(script: Vec<LlmReply>) -> Self {
        Self {
            script: StdMutex::new(script.into()),
            fallback: None,
            requests: StdMutex::new(Vec::new()),
        }
    }

    fn repeating(reply: LlmReply) -> Self {
        Self {
            fallback: Some(reply),
            ..Self::new(Vec::new())
        }
    }

    fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    /// Content of the last tool message sent in request `index`.
    fn tool_result_in(&self, index: usize) -> String {
        let requests = self.requests();
        requests[index]
            .0
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Tool)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete_with_tools(
        &self,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
    ) -> Result<LlmReply> {
        self.requests.lock().unwrap().push((messages, tools));
        let next = self.script.lock().unwrap().pop_front();
        match next.or_else(|| self.fallback.clone()) {
            Some(reply) => Ok(reply),
            None => anyhow::bail!("script exhausted"),
        }
    }
}

struct Fixture {
    _dir: TempDir,
    registry: SharedRegistry,
    memory: UserMemory,
}

fn fixture(resolver: StaticSecretResolver) -> Fixture {
    let dir = TempDir::new().unwrap();
    let catalog = CatalogFile::new(dir.path().join("tools_config.json"));
    let registry = ToolRegistry::open(Arc::new(resolver), catalog).unwrap();
    Fixture {
        _dir: dir,
        registry: Arc::new(Mutex::new(registry)),
        memory: UserMemory::new(Arc::new(InMemoryDocumentStore::new())),
    }
}

fn configured() -> StaticSecretResolver {
    StaticSecretResolver::new()
        .with_secret("GOOGLE_API_KEY", "google-secret-value")
        .with_secret("WEATHER_API_KEY", "weather-secret-value")
}

fn agent(fx: &Fixture, llm: Arc<ScriptedLlm>) -> AgentOrchestrator {
    AgentOrchestrator::new(llm, fx.registry.clone(), fx.memory.clone())
}

/// **Test: A reply without tool calls is returned as-is after one model call.**
#[tokio::test]
async fn test_direct_answer() {
    let fx = fixture(configured());
    let llm = Arc::new(ScriptedLlm::new(vec![LlmReply::text("Olá!")]));
    let reply = agent(&fx, llm.clone()).process_message("1", "oi").await.unwrap();

    assert_eq!(reply, "Olá!");
    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0[0].role, MessageRole::System);
    assert_eq!(requests[0].0[1], ChatMessage::user("oi"));
}

/// **Test: A model that never stops calling tools gets the fallback after 10 rounds.**
#[tokio::test]
async fn test_loop_exhausts_after_ten_rounds() {
    let fx = fixture(configured());
    let llm = Arc::new(ScriptedLlm::repeating(LlmReply::tool_call(
        "call",
        "search_web",
        r#"{"query":"rust"}"#,
    )));
    let reply = agent(&fx, llm.clone()).process_message("1", "loop").await.unwrap();

    assert_eq!(reply, MAX_ITERATIONS_REPLY);
    assert_eq!(llm.requests().len(), 10);
    // system + user + 9 (assistant call, tool result) pairs before the 10th call
    assert_eq!(llm.requests()[9].0.len(), 2 + 2 * 9);
}

/// **Test: The round limit is configurable.**
#[tokio::test]
async fn test_custom_max_iterations() {
    let fx = fixture(configured());
    let llm = Arc::new(ScriptedLlm::repeating(LlmReply::tool_call("c", "weather", "{}")));
    let reply = agent(&fx, llm.clone())
        .with_max_iterations(3)
        .process_message("1", "loop")
        .await
        .unwrap();
    assert_eq!(reply, MAX_ITERATIONS_REPLY);
    assert_eq!(llm.requests().len(), 3);
}

/// **Test: Tool call and result are appended with the call id; placeholder echoes the query.**
#[tokio::test]
async fn test_search_web_placeholder_and_transcript() {
    let fx = fixture(configured());
    let llm = Arc::new(ScriptedLlm::new(vec![
        LlmReply::tool_call("call_1", "search_web", r#"{"query":"tokio"}"#),
        LlmReply::text("done"),
    ]));
    agent(&fx, llm.clone()).process_message("1", "search").await.unwrap();

    let second = &llm.requests()[1].0;
    assert_eq!(second.len(), 4);
    assert_eq!(second[2].role, MessageRole::Assistant);
    assert_eq!(second[2].tool_calls[0].id, "call_1");
    assert_eq!(second[3].tool_call_id.as_deref(), Some("call_1"));
    assert_eq!(second[3].content, "Searching web for: tokio");
}

/// **Test: A seeded tool runs even when its secret is not configured.**
///
/// **Setup:** `GOOGLE_API_KEY` unset; the model calls `search_web`.
/// **Expected:** The placeholder echoes the query; secrets are only enforced on create/edit.
#[tokio::test]
async fn test_search_web_runs_without_configured_secret() {
    let fx = fixture(StaticSecretResolver::new().with_unset("GOOGLE_API_KEY"));
    let llm = Arc::new(ScriptedLlm::new(vec![
        LlmReply::tool_call("call_1", "search_web", r#"{"query":"tokio"}"#),
        LlmReply::text("done"),
    ]));
    let reply = agent(&fx, llm.clone()).process_message("1", "search").await.unwrap();

    assert_eq!(reply, "done");
    assert_eq!(llm.tool_result_in(1), "Searching web for: tokio");
}

/// **Test: Unknown tools and registered tools without an executor yield fixed texts.**
#[tokio::test]
async fn test_unknown_and_unimplemented_tools() {
    let fx = fixture(configured());
    let llm = Arc::new(ScriptedLlm::new(vec![
        LlmReply::tool_call("a", "teleport", "{}"),
        LlmReply::tool_call("b", "weather", r#"{"location":"Lisboa"}"#),
        LlmReply::tool_call("c", "calculate", r#"{"expression":"1+1"}"#),
        LlmReply::text("ok"),
    ]));
    agent(&fx, llm.clone()).process_message("1", "x").await.unwrap();

    assert_eq!(llm.tool_result_in(1), "Tool teleport not found");
    assert_eq!(llm.tool_result_in(2), NOT_IMPLEMENTED);
    // calculate is not in the default catalog
    assert_eq!(llm.tool_result_in(3), "Tool calculate not found");
}

/// **Test: create_tool registers a tool, persists it and offers it in the next round.**
#[tokio::test]
async fn test_create_tool_command() {
    let fx = fixture(configured());
    let llm = Arc::new(ScriptedLlm::new(vec![
        LlmReply::tool_call(
            "c1",
            "create_tool",
            r#"{"name":"calculate","description":"Evaluate math","parameters":{"type":"object","properties":{"expression":{"type":"string"}}}}"#,
        ),
        LlmReply::tool_call("c2", "calculate", r#"{"expression":"2*21"}"#),
        LlmReply::text("42"),
    ]));
    let reply = agent(&fx, llm.clone()).process_message("1", "make a calculator").await.unwrap();

    assert_eq!(reply, "42");
    assert!(llm
        .tool_result_in(1)
        .starts_with("Successfully created tool: {\"name\":\"calculate\""));
    assert!(llm.requests()[1].1.iter().any(|d| d.name == "calculate"));
    assert_eq!(llm.tool_result_in(2), "Calculating: 2*21");

    let registry = fx.registry.lock().await;
    assert!(registry.get_by_name("calculate").is_some());
    let reloaded = registry.catalog().load().unwrap().unwrap();
    assert!(reloaded.iter().any(|t| t.name() == "calculate"));
}

/// **Test: create_tool with an unavailable secret reports the error and changes nothing.**
#[tokio::test]
async fn test_create_tool_missing_secret() {
    let fx = fixture(configured().with_unset("STOCKS_API_KEY"));
    let llm = Arc::new(ScriptedLlm::new(vec![
        LlmReply::tool_call(
            "c1",
            "create_tool",
            r#"{"name":"stocks","description":"Quotes","parameters":{"type":"object","properties":{"key":{"type":"env_var","env_var_name":"STOCKS_API_KEY"}}}}"#,
        ),
        LlmReply::text("sorry"),
    ]));
    agent(&fx, llm.clone()).process_message("1", "stocks").await.unwrap();

    assert_eq!(
        llm.tool_result_in(1),
        "Error creating tool: Missing required environment variables for tool 'stocks': STOCKS_API_KEY"
    );
    assert_eq!(fx.registry.lock().await.len(), 2);
}

/// **Test: Invalid command arguments become error text, not a failure.**
#[tokio::test]
async fn test_create_tool_invalid_arguments() {
    let fx = fixture(configured());
    let llm = Arc::new(ScriptedLlm::new(vec![
        LlmReply::tool_call("c1", "create_tool", r#"{"name":"x"}"#),
        LlmReply::text("ok"),
    ]));
    agent(&fx, llm.clone()).process_message("1", "x").await.unwrap();
    assert!(llm
        .tool_result_in(1)
        .starts_with("Error creating tool: invalid arguments:"));
}

/// **Test: edit, history and delete commands go through the registry.**
#[tokio::test]
async fn test_edit_history_delete_commands() {
    let fx = fixture(configured());
    let llm = Arc::new(ScriptedLlm::new(vec![
        LlmReply::tool_call("e", "edit_tool", r#"{"name":"weather","description":"Forecast"}"#),
        LlmReply::tool_call("h", "get_tool_history", r#"{"name":"weather"}"#),
        LlmReply::tool_call("d", "delete_tool", r#"{"name":"weather"}"#),
        LlmReply::tool_call("h2", "get_tool_history", r#"{"name":"weather"}"#),
        LlmReply::text("ok"),
    ]));
    agent(&fx, llm.clone()).process_message("1", "x").await.unwrap();

    let edited = llm.tool_result_in(1);
    assert!(edited.starts_with("Tool edited successfully. Warning: Editing existing tools"));
    assert!(edited.contains("\nOriginal: {\"name\":\"weather\""));
    assert!(edited.contains("\nUpdated: {\"name\":\"weather\",\"description\":\"Forecast\""));

    let history = llm.tool_result_in(2);
    assert!(history.starts_with("Tool history: {\n"));
    assert!(history.contains("\"current_version\""));

    assert_eq!(llm.tool_result_in(3), "Successfully deleted tool: weather");
    assert_eq!(
        llm.tool_result_in(4),
        "Error getting tool history: Tool with name 'weather' not found"
    );
    assert!(fx.registry.lock().await.get_by_name("weather").is_none());
}

/// **Test: The system prompt shows memories and secret flags but never secret values.**
#[tokio::test]
async fn test_system_prompt_never_leaks_secret_values() {
    let fx = fixture(configured().with_unset("STOCKS_API_KEY"));
    let llm = Arc::new(ScriptedLlm::new(vec![LlmReply::text("ok")]));
    let agent = agent(&fx, llm.clone());
    agent
        .update_user_memory("1", "language", json!("pt-BR"))
        .await
        .unwrap();
    agent.process_message("1", "oi").await.unwrap();

    let requests = llm.requests();
    let system = &requests[0].0[0].content;
    assert!(system.contains("- language: pt-BR"));
    assert!(system.contains("- GOOGLE_API_KEY: [Available]"));
    assert!(system.contains("- STOCKS_API_KEY: [Not configured]"));
    assert!(system.contains("- search_web: "));
    assert!(!system.contains("google-secret-value"));
    assert!(!system.contains("weather-secret-value"));

    // env_var parameters are not part of the model-facing function schema
    let search = requests[0].1.iter().find(|d| d.name == "search_web").unwrap();
    assert!(!search.parameters.to_string().contains("env_var"));
}

/// **Test: A model failure is an error for the caller.**
#[tokio::test]
async fn test_model_error_propagates() {
    let fx = fixture(configured());
    let llm = Arc::new(ScriptedLlm::new(vec![]));
    assert!(agent(&fx, llm).process_message("1", "oi").await.is_err());
}
