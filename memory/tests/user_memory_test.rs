//! Tests for [`memory::UserMemory`] over the in-memory document store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use memory::{
    fact_text, DocumentMetadata, DocumentStore, MemoryError, NewDocument, StoredDocument,
    UserMemory,
};
use memory_inmemory::InMemoryDocumentStore;
use serde_json::json;

fn setup() -> (InMemoryDocumentStore, UserMemory) {
    let store = InMemoryDocumentStore::new();
    let memory = UserMemory::new(Arc::new(store.clone()));
    (store, memory)
}

fn raw(uuid: &str, user: &str, content: &str, day: u32) -> StoredDocument {
    StoredDocument {
        uuid: uuid.to_string(),
        content: content.to_string(),
        metadata: DocumentMetadata::user_memory(user),
        created_at: Some(Utc.with_ymd_and_hms(2026, 1, day, 0, 0, 0).unwrap()),
    }
}

/// **Test: set then get returns the value; a second set of the same key wins.**
#[tokio::test]
async fn test_set_get_last_value_wins() {
    let (_store, memory) = setup();
    memory.set("1", "language", json!("pt-BR")).await.unwrap();
    assert_eq!(memory.get("1").await.unwrap()["language"], json!("pt-BR"));

    memory.set("1", "language", json!("en")).await.unwrap();
    let facts = memory.get("1").await.unwrap();
    assert_eq!(facts["language"], json!("en"));
    assert_eq!(facts.len(), 1);
}

/// **Test: set merges with existing keys and compacts to a single blob.**
#[tokio::test]
async fn test_set_merges_and_compacts() {
    let (store, memory) = setup();
    memory.set("1", "language", json!("pt-BR")).await.unwrap();
    memory.set("1", "name", json!("Ana")).await.unwrap();

    let facts = memory.get("1").await.unwrap();
    assert_eq!(facts["language"], json!("pt-BR"));
    assert_eq!(facts["name"], json!("Ana"));
    assert_eq!(store.search_by_user("1").await.unwrap().len(), 1);
}

/// **Test: Users are isolated.**
#[tokio::test]
async fn test_users_isolated() {
    let (_store, memory) = setup();
    memory.set("1", "name", json!("Ana")).await.unwrap();
    assert!(memory.get("2").await.unwrap().is_empty());
}

/// **Test: Blobs merge in created_at order regardless of store order; bad blobs are skipped.**
#[tokio::test]
async fn test_get_orders_by_created_at_and_skips_unparseable() {
    let (store, memory) = setup();
    store.insert_raw(raw("c", "1", "{\"city\":\"Porto\"}", 3)).await;
    store.insert_raw(raw("a", "1", "{\"city\":\"Lisboa\",\"pet\":\"cat\"}", 1)).await;
    store.insert_raw(raw("b", "1", "not json", 2)).await;
    store.insert_raw(raw("d", "1", "[1,2]", 4)).await;

    let facts = memory.get("1").await.unwrap();
    assert_eq!(facts["city"], json!("Porto"));
    assert_eq!(facts["pet"], json!("cat"));
    assert_eq!(facts.len(), 2);
}

/// **Test: clear removes every blob of the user only.**
#[tokio::test]
async fn test_clear() {
    let (store, memory) = setup();
    memory.set("1", "a", json!(1)).await.unwrap();
    memory.set("2", "b", json!(2)).await.unwrap();

    assert_eq!(memory.clear("1").await.unwrap(), 1);
    assert!(memory.get("1").await.unwrap().is_empty());
    assert_eq!(store.len().await, 1);
}

struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn ensure_collection(&self) -> Result<(), MemoryError> {
        Err(MemoryError::service("down"))
    }
    async fn add(&self, _document: NewDocument) -> Result<String, MemoryError> {
        Err(MemoryError::service("down"))
    }
    async fn search_by_user(&self, _user_id: &str) -> Result<Vec<StoredDocument>, MemoryError> {
        Err(MemoryError::service("down"))
    }
    async fn delete(&self, _uuid: &str) -> Result<(), MemoryError> {
        Err(MemoryError::service("down"))
    }
}

/// **Test: Store failures propagate as MemoryError::Service.**
#[tokio::test]
async fn test_service_errors_propagate() {
    let memory = UserMemory::new(Arc::new(FailingStore));
    assert!(matches!(memory.init().await, Err(MemoryError::Service(_))));
    assert!(matches!(memory.get("1").await, Err(MemoryError::Service(_))));
    assert!(matches!(
        memory.set("1", "k", json!(1)).await,
        Err(MemoryError::Service(_))
    ));
}

#[test]
fn test_fact_text() {
    assert_eq!(fact_text(&json!("pt-BR")), "pt-BR");
    assert_eq!(fact_text(&json!(3)), "3");
    assert_eq!(fact_text(&json!({"a": true})), "{\"a\":true}");
}
