//! Single-shot retrieval-augmented generation without a graph.

use std::sync::Arc;

use futures::StreamExt;
use tracing::debug;

use crate::document::{format_context, Document};
use crate::error::AgentError;
use crate::llm::{LlmClient, TextStream};
use crate::prompt::PromptTemplate;
use crate::retriever::Retriever;

/// Reply when retrieval returns nothing. The LLM is not called.
pub const EMPTY_RETRIEVAL_ANSWER: &str =
    "Sorry, I could not find any relevant information in the knowledge base.";

pub(super) fn failed(prefix: &str, e: impl std::fmt::Display) -> AgentError {
    AgentError::ExecutionFailed(format!("{}: {}", prefix, e))
}

/// Prefixes every error of `stream` with `prefix`.
pub(super) fn wrap_stream(stream: TextStream, prefix: &'static str) -> TextStream {
    Box::pin(stream.map(move |item| item.map_err(|e| failed(prefix, e))))
}

/// One text item, for answers that need no LLM.
pub(super) fn single_item(text: &str) -> TextStream {
    Box::pin(futures::stream::iter([Ok::<_, AgentError>(text.to_string())]))
}

/// Retrieve `k` documents, render them into the template, ask the LLM.
///
/// **Interaction**: Uses `Retriever` and `LlmClient` directly; the graph
/// presets cover the same ground with routing on top.
pub struct RagChain {
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    template: PromptTemplate,
}

impl RagChain {
    /// Uses the default RAG template.
    pub fn new(llm: Arc<dyn LlmClient>, retriever: Arc<dyn Retriever>) -> Self {
        Self {
            llm,
            retriever,
            template: PromptTemplate::default(),
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    async fn retrieve(&self, question: &str, k: usize) -> Result<Vec<Document>, AgentError> {
        let docs = self
            .retriever
            .search(question, k)
            .await
            .map_err(|e| failed("RAG query failed", e))?;
        debug!(found = docs.len(), k, "chain retrieved");
        Ok(docs)
    }

    /// Answer for `question` from the top `k` documents.
    ///
    /// Retrieval and LLM failures come back as
    /// `ExecutionFailed("RAG query failed: …")`.
    pub async fn query(&self, question: &str, k: usize) -> Result<String, AgentError> {
        let docs = self.retrieve(question, k).await?;
        if docs.is_empty() {
            return Ok(EMPTY_RETRIEVAL_ANSWER.to_string());
        }
        let prompt = self.template.format(&format_context(&docs), question);
        self.llm
            .generate(&prompt)
            .await
            .map_err(|e| failed("RAG query failed", e))
    }

    /// Like `query`, but the answer arrives as fragments.
    pub async fn stream_query(&self, question: &str, k: usize) -> Result<TextStream, AgentError> {
        let docs = self.retrieve(question, k).await?;
        if docs.is_empty() {
            return Ok(single_item(EMPTY_RETRIEVAL_ANSWER));
        }
        let prompt = self.template.format(&format_context(&docs), question);
        let stream = self
            .llm
            .stream_generate(&prompt)
            .await
            .map_err(|e| failed("RAG query failed", e))?;
        Ok(wrap_stream(stream, "RAG query failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use crate::retriever::MockRetriever;

    fn chain(llm: &MockLlm, docs: Vec<Document>) -> RagChain {
        RagChain::new(Arc::new(llm.clone()), Arc::new(MockRetriever::new(docs)))
    }

    /// **Scenario**: query renders the numbered context and returns the LLM answer.
    #[tokio::test]
    async fn query_answers_from_context() {
        let llm = MockLlm::new("Rust is fast.");
        let answer = chain(&llm, vec![Document::new("Rust is a language.")])
            .query("What is Rust?", 4)
            .await
            .unwrap();
        assert_eq!(answer, "Rust is fast.");
        assert!(llm.prompts()[0].contains("[Document 1]\nRust is a language."));
    }

    /// **Scenario**: Empty retrieval gives the fixed reply and skips the LLM, in both modes.
    #[tokio::test]
    async fn empty_retrieval_skips_llm() {
        let llm = MockLlm::new("never");
        let c = chain(&llm, vec![]);
        assert_eq!(c.query("q", 4).await.unwrap(), EMPTY_RETRIEVAL_ANSWER);
        let parts: Vec<_> = c.stream_query("q", 4).await.unwrap().collect().await;
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].as_deref().unwrap(), EMPTY_RETRIEVAL_ANSWER);
        assert_eq!(llm.call_count(), 0);
    }

    /// **Scenario**: Failures are wrapped with the chain's prefix.
    #[tokio::test]
    async fn failures_are_wrapped() {
        let c = RagChain::new(
            Arc::new(MockLlm::new("x")),
            Arc::new(MockRetriever::failing("index offline")),
        );
        let err = c.query("q", 4).await.unwrap_err().to_string();
        assert!(err.contains("RAG query failed"), "{}", err);
        assert!(err.contains("index offline"), "{}", err);

        let c = chain(&MockLlm::failing("quota"), vec![Document::new("d")]);
        let err = c.query("q", 4).await.unwrap_err().to_string();
        assert!(err.contains("RAG query failed") && err.contains("quota"), "{}", err);
    }

    /// **Scenario**: stream_query yields fragments that concatenate to the answer.
    #[tokio::test]
    async fn stream_query_yields_fragments() {
        let llm = MockLlm::new("streamed answer").with_chunk_chars(3);
        let c = chain(&llm, vec![Document::new("d")]);
        let parts: Vec<String> = c
            .stream_query("q", 4)
            .await
            .unwrap()
            .map(|p| p.unwrap())
            .collect()
            .await;
        assert!(parts.len() > 1);
        assert_eq!(parts.concat(), "streamed answer");
    }
}
