//! Embedder: text to vectors, for `InMemoryVectorStore`.

use async_trait::async_trait;

use super::RetrievalError;

/// Turns texts into fixed-size vectors.
///
/// Implementations: `OpenAIEmbedder` (feature `openai`); tests use small
/// deterministic embedders.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// One vector per input text, in input order.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError>;

    /// Vector length produced by `embed`.
    fn dimension(&self) -> usize;
}
