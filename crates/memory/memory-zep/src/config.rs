//! Zep connection settings loaded from the environment.

use anyhow::{Context, Result};
use std::env;

/// Collection holding user memory blobs.
pub const DEFAULT_COLLECTION: &str = "user_memory";

#[derive(Debug, Clone)]
pub struct ZepConfig {
    /// Base URL of the Zep server, e.g. `https://api.zep.cloud`.
    pub api_url: String,
    pub api_key: String,
    pub collection: String,
}

impl ZepConfig {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Loads `ZEP_API_URL`, `ZEP_API_KEY` (both required) and `ZEP_COLLECTION`.
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("ZEP_API_URL").context("ZEP_API_URL not set")?;
        let api_key = env::var("ZEP_API_KEY").context("ZEP_API_KEY not set")?;
        let collection = env::var("ZEP_COLLECTION")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());
        Ok(Self {
            api_url,
            api_key,
            collection,
        })
    }
}
