//! In-memory vector store: embeds documents on insert, ranks by cosine similarity.
//!
//! Behind feature `in-memory-vector`. Suitable for tests and small corpora.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::document::Document;

use super::{Embedder, RetrievalError, Retriever};

/// Pure in-memory vector store for semantic search.
///
/// **Interaction**: Used as `Arc<dyn Retriever>` by the retrieve step and the
/// chains. Results carry the cosine similarity in `metadata["score"]`.
///
/// **In-Memory**: All data stored in memory, lost when store is dropped.
pub struct InMemoryVectorStore {
    data: DashMap<u64, VectorEntry>,
    embedder: Arc<dyn Embedder>,
    next_id: AtomicU64,
}

/// Entry in the vector store.
#[derive(Clone)]
struct VectorEntry {
    vector: Vec<f32>,
    document: Document,
}

impl InMemoryVectorStore {
    /// Creates a new in-memory vector store.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let embedder = Arc::new(OpenAIEmbedder::new("text-embedding-3-small"));
    /// let store = InMemoryVectorStore::new(embedder);
    /// ```
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            data: DashMap::new(),
            embedder,
            next_id: AtomicU64::new(0),
        }
    }

    /// Embeds and stores `documents`. Returns how many were added.
    pub async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, RetrievalError> {
        if documents.is_empty() {
            return Ok(0);
        }
        let texts: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
        let vectors = self.embedder.embed(&texts).await?;
        if vectors.len() != documents.len() {
            return Err(RetrievalError::Embedding(format!(
                "expected {} vectors, got {}",
                documents.len(),
                vectors.len()
            )));
        }

        let added = documents.len();
        for (document, vector) in documents.into_iter().zip(vectors) {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            self.data.insert(id, VectorEntry { vector, document });
        }
        debug!(added, total = self.data.len(), "documents indexed");
        Ok(added)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Computes cosine similarity between two vectors.
    ///
    /// Returns 0.0 if either vector has zero magnitude.
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            dot_product / (norm_a * norm_b)
        }
    }
}

#[async_trait]
impl Retriever for InMemoryVectorStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Document>, RetrievalError> {
        if self.data.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let vectors = self.embedder.embed(&[query]).await?;
        let query_vec = vectors
            .into_iter()
            .next()
            .ok_or_else(|| RetrievalError::Embedding("No vector returned".into()))?;

        let mut scores: Vec<(u64, f32)> = self
            .data
            .iter()
            .map(|entry| (*entry.key(), Self::cosine_similarity(&query_vec, &entry.vector)))
            .collect();
        // Ties keep insertion order.
        scores.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let hits = scores
            .into_iter()
            .take(k)
            .filter_map(|(id, score)| {
                self.data.get(&id).map(|e| {
                    e.document
                        .clone()
                        .with_score(f64::from(score.clamp(0.0, 1.0)))
                })
            })
            .collect();
        Ok(hits)
    }
}
