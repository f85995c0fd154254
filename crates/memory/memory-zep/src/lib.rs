//! # Zep Document Store
//!
//! Implements [`memory_core::DocumentStore`] on top of a Zep document collection (REST v1).
//!
//! ## Endpoints
//!
//! - `GET  /api/v1/collection/{name}`: collection lookup (404 when missing)
//! - `POST /api/v1/collection/{name}`: create collection
//! - `POST /api/v1/collection/{name}/document`: add documents, returns uuids
//! - `POST /api/v1/collection/{name}/search?limit=N`: metadata-filtered search
//! - `DELETE /api/v1/collection/{name}/document/uuid/{uuid}`: delete one document
//!
//! Requests carry `Authorization: Api-Key {key}`.

mod config;

pub use config::{ZepConfig, DEFAULT_COLLECTION};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use memory_core::{
    DocumentMetadata, DocumentStore, MemoryError, NewDocument, StoredDocument, USER_MEMORY_KIND,
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

/// Maximum documents fetched per user search.
pub const SEARCH_LIMIT: usize = 1000;

const COLLECTION_DESCRIPTION: &str = "User memory storage";

/// Zep-backed document store.
#[derive(Debug, Clone)]
pub struct ZepDocumentStore {
    client: Client,
    config: ZepConfig,
}

#[derive(Debug, Serialize)]
struct CreateCollectionRequest<'a> {
    name: &'a str,
    description: &'a str,
    metadata: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    uuid: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    metadata: Option<DocumentMetadata>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl ZepDocumentStore {
    pub fn new(config: ZepConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ZepConfig {
        &self.config
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/api/v1/collection/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.collection
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("Authorization", format!("Api-Key {}", self.config.api_key))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, MemoryError> {
        self.authorize(request)
            .send()
            .await
            .map_err(|e| MemoryError::service(format!("request failed: {}", e)))
    }

    async fn error_for_status(
        response: reqwest::Response,
        action: &str,
    ) -> Result<reqwest::Response, MemoryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(MemoryError::service(format!(
            "{} failed with status {}: {}",
            action, status, body
        )))
    }

    async fn create_collection(&self) -> Result<(), MemoryError> {
        let body = CreateCollectionRequest {
            name: &self.config.collection,
            description: COLLECTION_DESCRIPTION,
            metadata: json!({ "type": USER_MEMORY_KIND }),
        };
        let response = self
            .send(self.client.post(self.collection_url()).json(&body))
            .await?;
        Self::error_for_status(response, "create collection").await?;
        info!(collection = %self.config.collection, "Zep collection created");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for ZepDocumentStore {
    #[instrument(skip(self), fields(collection = %self.config.collection))]
    async fn ensure_collection(&self) -> Result<(), MemoryError> {
        let response = self.send(self.client.get(self.collection_url())).await?;
        match response.status() {
            status if status.is_success() => {
                debug!("Zep collection exists");
                Ok(())
            }
            StatusCode::NOT_FOUND => {
                warn!("Zep collection missing, creating");
                self.create_collection().await
            }
            _ => Self::error_for_status(response, "get collection")
                .await
                .map(|_| ()),
        }
    }

    #[instrument(skip(self, document), fields(user_id = %document.metadata.user_id))]
    async fn add(&self, document: NewDocument) -> Result<String, MemoryError> {
        let url = format!("{}/document", self.collection_url());
        let response = self
            .send(self.client.post(url).json(&vec![document]))
            .await?;
        let response = Self::error_for_status(response, "add document").await?;
        let uuids: Vec<String> = response
            .json()
            .await
            .map_err(|e| MemoryError::parse(format!("add document response: {}", e)))?;
        uuids
            .into_iter()
            .next()
            .ok_or_else(|| MemoryError::parse("add document returned no uuid"))
    }

    #[instrument(skip(self))]
    async fn search_by_user(&self, user_id: &str) -> Result<Vec<StoredDocument>, MemoryError> {
        let url = format!("{}/search?limit={}", self.collection_url(), SEARCH_LIMIT);
        let jsonpath = format!(
            "$[*] ? (@.user_id == {} && @.type == \"{}\")",
            serde_json::Value::String(user_id.to_string()),
            USER_MEMORY_KIND
        );
        let body = json!({ "metadata": { "where": { "jsonpath": jsonpath } } });
        let response = self.send(self.client.post(url).json(&body)).await?;
        let response = Self::error_for_status(response, "search documents").await?;
        let results: Vec<SearchResult> = response
            .json()
            .await
            .map_err(|e| MemoryError::parse(format!("search response: {}", e)))?;
        debug!(count = results.len(), "Zep search results");
        Ok(results
            .into_iter()
            .map(|r| StoredDocument {
                uuid: r.uuid,
                content: r.content,
                metadata: r
                    .metadata
                    .unwrap_or_else(|| DocumentMetadata::user_memory(user_id)),
                created_at: r.created_at,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, uuid: &str) -> Result<(), MemoryError> {
        let url = format!("{}/document/uuid/{}", self.collection_url(), uuid);
        let response = self.send(self.client.delete(url)).await?;
        Self::error_for_status(response, "delete document").await?;
        Ok(())
    }
}
