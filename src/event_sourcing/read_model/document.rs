use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// JSON Document - a projected read model entry
// ============================================================================

/// Read model document: an id plus its raw JSON(-LD) body
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct JsonDocument {
    id: String,
    body: String,
}

impl JsonDocument {
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Parse the body into a JSON value
    pub fn body(&self) -> Result<Value> {
        serde_json::from_str(&self.body)
            .with_context(|| format!("document {} does not contain valid JSON", self.id))
    }
}
