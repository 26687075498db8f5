//! Retrieval capability used by the retrieve step and the chains.
//!
//! A `Retriever` answers "top-k chunks for this query". Scores, when the
//! backend has them, go into `Document::metadata["score"]`.

mod embedder;
mod mock;

#[cfg(feature = "in-memory-vector")]
mod in_memory;

#[cfg(feature = "openai")]
mod openai_embedder;

pub use embedder::Embedder;
pub use mock::MockRetriever;

#[cfg(feature = "in-memory-vector")]
pub use in_memory::InMemoryVectorStore;

#[cfg(feature = "openai")]
pub use openai_embedder::OpenAIEmbedder;

use async_trait::async_trait;
use thiserror::Error;

use crate::document::Document;

/// Retrieval or embedding failure.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The search backend failed (connection, timeout, bad response).
    #[error("search failed: {0}")]
    Search(String),
    /// Turning text into vectors failed.
    #[error("embedding failed: {0}")]
    Embedding(String),
}

/// Similarity search over a knowledge base.
///
/// Must tolerate an empty index: that is `Ok(vec![])`, not an error.
///
/// **Interaction**: Used by `RetrieveNode`, `RagChain`, `ConversationalRagChain`.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Top `k` documents for `query`, best first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Document>, RetrievalError>;
}
