use std::collections::HashMap;
use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tokio::sync::RwLock;

use super::document::JsonDocument;

// ============================================================================
// Document Repository - read access to projected documents
// ============================================================================
//
// `Ok(None)` means the projection does not (yet) exist. Transport failures
// are errors, so callers can tell "absent" from "unreachable".
//
// ============================================================================

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<JsonDocument>>;
}

// ============================================================================
// In-memory implementation
// ============================================================================

#[derive(Default)]
pub struct InMemoryDocumentRepository {
    documents: RwLock<HashMap<String, JsonDocument>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn save(&self, document: JsonDocument) {
        self.documents
            .write()
            .await
            .insert(document.id().to_string(), document);
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn get(&self, id: &str) -> Result<Option<JsonDocument>> {
        Ok(self.documents.read().await.get(id).cloned())
    }
}

// ============================================================================
// Redis implementation
// ============================================================================
//
// Projectors store every document as a JSON string under `{prefix}{id}`.
//
// ============================================================================

pub struct RedisDocumentRepository {
    connection: MultiplexedConnection,
    key_prefix: String,
}

impl RedisDocumentRepository {
    pub async fn connect(redis_url: &str, key_prefix: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .with_context(|| format!("invalid redis url {}", redis_url))?;
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .context("failed to connect to redis")?;

        tracing::info!(redis_url = %redis_url, key_prefix = %key_prefix, "Connected to read model");

        Ok(Self {
            connection,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn document_key(&self, id: &str) -> String {
        document_key(&self.key_prefix, id)
    }
}

fn document_key(prefix: &str, id: &str) -> String {
    format!("{}{}", prefix, id)
}

#[async_trait]
impl DocumentRepository for RedisDocumentRepository {
    async fn get(&self, id: &str) -> Result<Option<JsonDocument>> {
        let key = self.document_key(id);
        let mut connection = self.connection.clone();

        let body: Option<String> = connection
            .get(&key)
            .await
            .with_context(|| format!("failed to read document {} from redis", key))?;

        tracing::debug!(document_id = %id, found = body.is_some(), "Loaded read model document");

        Ok(body.map(|body| JsonDocument::new(id, body)))
    }
}
