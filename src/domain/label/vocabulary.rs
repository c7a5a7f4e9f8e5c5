use std::time::{Duration, Instant};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use super::value_objects::Label;

// ============================================================================
// UiTPAS Label Vocabulary
// ============================================================================
//
// The labels UiTPAS manages on events. Only these labels are ever added to
// or removed from an event by the sync; everything else is left alone.
// Implementations return the labels in a stable order.
//
// ============================================================================

#[async_trait]
pub trait LabelVocabulary: Send + Sync {
    async fn load_all(&self) -> Result<Vec<Label>>;
}

/// Parse a `{"CODE": "Display name", ...}` object into its display names,
/// in key order.
pub fn parse_vocabulary(body: &str) -> Result<Vec<Label>> {
    let labels: IndexMap<String, String> = serde_json::from_str(body)
        .context("UiTPAS labels response is not a JSON object of strings")?;

    Ok(labels.into_values().map(Label::from).collect())
}

// ============================================================================
// Static vocabulary
// ============================================================================

pub struct StaticLabelVocabulary {
    labels: Vec<Label>,
}

impl StaticLabelVocabulary {
    pub fn new(labels: Vec<Label>) -> Self {
        Self { labels }
    }
}

#[async_trait]
impl LabelVocabulary for StaticLabelVocabulary {
    async fn load_all(&self) -> Result<Vec<Label>> {
        Ok(self.labels.clone())
    }
}

// ============================================================================
// HTTP vocabulary - fetched from the UiTPAS API
// ============================================================================

pub struct HttpLabelVocabulary {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLabelVocabulary {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl LabelVocabulary for HttpLabelVocabulary {
    async fn load_all(&self) -> Result<Vec<Label>> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .with_context(|| format!("failed to fetch UiTPAS labels from {}", self.endpoint))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("UiTPAS labels request to {} failed ({}): {}", self.endpoint, status, body);
        }

        let body = response
            .text()
            .await
            .context("failed to read UiTPAS labels response")?;

        let labels = parse_vocabulary(&body)?;

        tracing::debug!(endpoint = %self.endpoint, label_count = labels.len(), "Fetched UiTPAS labels");

        Ok(labels)
    }
}

// ============================================================================
// Cached vocabulary - read-through with a time to live
// ============================================================================
//
// Failed fetches are returned to the caller and never cached; an expired
// entry is only replaced by a successful fetch.
//
// ============================================================================

pub struct CachedLabelVocabulary<V> {
    inner: V,
    ttl: Duration,
    cached: RwLock<Option<CachedLabels>>,
}

struct CachedLabels {
    labels: Vec<Label>,
    fetched_at: Instant,
}

impl CachedLabels {
    fn fresh(&self, ttl: Duration) -> Option<Vec<Label>> {
        (self.fetched_at.elapsed() < ttl).then(|| self.labels.clone())
    }
}

impl<V: LabelVocabulary> CachedLabelVocabulary<V> {
    pub fn new(inner: V, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cached: RwLock::new(None),
        }
    }
}

#[async_trait]
impl<V: LabelVocabulary> LabelVocabulary for CachedLabelVocabulary<V> {
    async fn load_all(&self) -> Result<Vec<Label>> {
        if let Some(labels) = self.cached.read().await.as_ref().and_then(|c| c.fresh(self.ttl)) {
            return Ok(labels);
        }

        let mut cached = self.cached.write().await;

        // Refreshed by a concurrent caller while waiting for the lock
        if let Some(labels) = cached.as_ref().and_then(|c| c.fresh(self.ttl)) {
            return Ok(labels);
        }

        let labels = self.inner.load_all().await?;
        *cached = Some(CachedLabels {
            labels: labels.clone(),
            fetched_at: Instant::now(),
        });

        Ok(labels)
    }
}
