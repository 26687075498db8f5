//! Retrieved text chunk with free-form metadata.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata key that carries a relevance score in [0, 1].
pub const SCORE_KEY: &str = "score";

/// One chunk of the knowledge base, as returned by a `Retriever`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Sets `metadata["score"]`.
    pub fn with_score(mut self, score: f64) -> Self {
        self.metadata.insert(SCORE_KEY.to_string(), Value::from(score));
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Relevance score from metadata, if present and numeric.
    pub fn score(&self) -> Option<f64> {
        self.metadata.get(SCORE_KEY).and_then(Value::as_f64)
    }
}

/// Labels each document `[Document i]` (1-based) and joins them with a blank line.
pub fn format_context(docs: &[Document]) -> String {
    docs.iter()
        .enumerate()
        .map(|(i, d)| format!("[Document {}]\n{}", i + 1, d.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Document contents joined with a blank line, without labels.
pub fn join_contents(docs: &[Document]) -> String {
    docs.iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
