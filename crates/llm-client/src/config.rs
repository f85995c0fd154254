//! LLM configuration: trait and env-based implementation.

use anyhow::{Context, Result};
use std::env;

/// Groq's OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

/// Upper bound on model rounds per user message.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// LLM configuration interface for OpenAI-compatible APIs.
pub trait LlmConfig: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn max_iterations(&self) -> usize;
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub groq_api_key: String,
    pub groq_base_url: String,
    pub llm_model: String,
    pub max_iterations: usize,
}

impl LlmConfig for EnvLlmConfig {
    fn api_key(&self) -> &str {
        &self.groq_api_key
    }
    fn base_url(&self) -> &str {
        &self.groq_base_url
    }
    fn model(&self) -> &str {
        &self.llm_model
    }
    fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}

impl EnvLlmConfig {
    /// Load from environment variables.
    ///
    /// `GROQ_API_KEY` is required; `GROQ_BASE_URL`, `MODEL` and `AGENT_MAX_ITERATIONS` fall back
    /// to defaults. A zero or unparsable iteration count uses the default.
    pub fn from_env() -> Result<Self> {
        let groq_api_key = env::var("GROQ_API_KEY").context("GROQ_API_KEY not set")?;
        let groq_base_url =
            env::var("GROQ_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let llm_model = env::var("MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let max_iterations = env::var("AGENT_MAX_ITERATIONS")
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_ITERATIONS);
        Ok(Self {
            groq_api_key,
            groq_base_url,
            llm_model,
            max_iterations,
        })
    }
}
