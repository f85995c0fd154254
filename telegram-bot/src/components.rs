//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use std::path::Path;
use std::sync::Arc;

use agent::{AgentOrchestrator, SharedRegistry};
use anyhow::{Context, Result};
use dbot_core::Bot;
use handler_chain::{HandlerChain, TextGuard};
use llm_client::{LlmClient, LlmConfig, OpenAILlmClient};
use llm_handlers::{AgentHandler, CommandHandler};
use memory::UserMemory;
use memory_zep::{ZepConfig, ZepDocumentStore};
use tokio::sync::Mutex;
use tool_registry::{CatalogFile, EnvSecretResolver, SecretResolver, ToolRegistry};
use tracing::{info, instrument, warn};

use super::config::BotConfig;

/// Everything the handler chain needs; produced by the component factory.
#[derive(Clone)]
pub struct BotComponents {
    pub teloxide_bot: teloxide::Bot,
    pub registry: SharedRegistry,
    pub memory: UserMemory,
    pub agent: AgentOrchestrator,
}

/// Loads the secrets declaration and exports its entries into the process environment.
///
/// A missing file yields a resolver with no declared keys.
pub fn load_secret_resolver(path: impl AsRef<Path>) -> Result<Arc<dyn SecretResolver>> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "Secrets declaration not found, no tool secrets declared");
        return Ok(Arc::new(EnvSecretResolver::default()));
    }
    dotenvy::from_path(path)
        .with_context(|| format!("Failed to load {} into the environment", path.display()))?;
    let resolver = EnvSecretResolver::from_file(path)?;
    Ok(Arc::new(resolver))
}

/// Opens the tool registry from the durable catalog (seeding defaults when absent).
#[instrument]
pub fn build_registry(tools_config_path: &str, tool_keys_path: &str) -> Result<SharedRegistry> {
    let resolver = load_secret_resolver(tool_keys_path)?;
    let registry = ToolRegistry::open(resolver, CatalogFile::new(tools_config_path))
        .with_context(|| format!("Failed to open tool registry at {}", tools_config_path))?;
    info!(tools = registry.len(), "step: tool registry ready");
    Ok(Arc::new(Mutex::new(registry)))
}

/// Connects user memory to Zep and makes sure the collection exists.
#[instrument(skip(zep), fields(api_url = %zep.api_url, collection = %zep.collection))]
pub async fn build_memory(zep: &ZepConfig) -> Result<UserMemory> {
    let store = Arc::new(ZepDocumentStore::new(zep.clone()));
    let memory = UserMemory::new(store);
    memory
        .init()
        .await
        .context("Failed to initialize memory collection")?;
    info!("step: memory collection ready");
    Ok(memory)
}

/// Agent wired to Groq with the configured model and round limit.
pub fn build_agent(
    llm_config: &dyn LlmConfig,
    registry: SharedRegistry,
    memory: UserMemory,
) -> AgentOrchestrator {
    let llm: Arc<dyn LlmClient> = Arc::new(OpenAILlmClient::from_config(llm_config));
    AgentOrchestrator::new(llm, registry, memory).with_max_iterations(llm_config.max_iterations())
}

/// Builds BotComponents: teloxide bot, tool registry, Zep-backed memory and the agent.
#[instrument(skip(config))]
pub async fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let teloxide_bot = config.base.telegram().build_bot()?;
    let registry = build_registry(config.tools_config_path(), config.tool_keys_path())?;
    let memory = build_memory(&config.zep).await?;
    let agent = build_agent(&config.llm, registry.clone(), memory.clone());

    info!(
        model = %config.llm.model(),
        max_iterations = agent.max_iterations(),
        "step: components built"
    );

    Ok(BotComponents {
        teloxide_bot,
        registry,
        memory,
        agent,
    })
}

/// Builds the handler chain (text guard → commands → agent).
pub fn build_handler_chain(components: &BotComponents, bot: Arc<dyn Bot>) -> HandlerChain {
    let commands = CommandHandler::new(
        bot.clone(),
        components.registry.clone(),
        components.memory.clone(),
    );
    let agent = AgentHandler::new(bot, components.agent.clone());
    HandlerChain::new()
        .add_handler(Arc::new(TextGuard))
        .add_handler(Arc::new(commands))
        .add_handler(Arc::new(agent))
}
