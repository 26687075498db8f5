//! Fixed-result retriever for tests and offline runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::document::Document;

use super::{RetrievalError, Retriever};

/// Returns the same documents for every query, truncated to `k`.
///
/// Clones share the call counter and the recorded queries.
#[derive(Clone, Default)]
pub struct MockRetriever {
    docs: Vec<Document>,
    failure: Option<String>,
    calls: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockRetriever {
    pub fn new(docs: Vec<Document>) -> Self {
        Self {
            docs,
            ..Self::default()
        }
    }

    /// Retriever over an empty index.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Documents with the given scores in `metadata["score"]`, content `doc {i}`.
    pub fn with_scores(scores: &[f64]) -> Self {
        Self::new(
            scores
                .iter()
                .enumerate()
                .map(|(i, s)| Document::new(format!("doc {}", i + 1)).with_score(*s))
                .collect(),
        )
    }

    /// Every search fails with `RetrievalError::Search(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Queries received so far, oldest first.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Retriever for MockRetriever {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Document>, RetrievalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query.to_string());
        if let Some(msg) = &self.failure {
            return Err(RetrievalError::Search(msg.clone()));
        }
        Ok(self.docs.iter().take(k).cloned().collect())
    }
}
