//! Generate node: prompt the LLM with the retrieved context.
//!
//! Writes `answer`, `confidence_score` and, on failure, `error`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::document::format_context;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::prompt::PromptTemplate;
use crate::state::AgentState;

use super::{bounded, GENERATE};

/// Answer when retrieval found nothing. The LLM is not called.
pub const NO_INFORMATION_ANSWER: &str =
    "Sorry, I could not find relevant information in the knowledge base to answer your question.";

/// Answer when the LLM call failed; details go to `AgentState::error`.
pub const GENERATION_FALLBACK_ANSWER: &str =
    "Sorry, something went wrong while generating the answer. Please try again later.";

/// Retrieval score assumed when none was recorded.
pub(crate) const DEFAULT_RETRIEVAL_SCORE: f64 = 0.5;

/// `retrieval_score * 0.6 + min(chars(answer) / 100, 1) * 0.4`.
pub fn generation_confidence(retrieval_score: Option<f64>, answer: &str) -> f64 {
    let retrieval = retrieval_score.unwrap_or(DEFAULT_RETRIEVAL_SCORE);
    let completeness = (answer.chars().count() as f64 / 100.0).min(1.0);
    retrieval * 0.6 + completeness * 0.4
}

/// Generate node: one LLM call over the `[Document i]` context.
///
/// **Interaction**: Implements `Node<AgentState>`; consumes `LlmClient`.
pub struct GenerateNode {
    llm: Arc<dyn LlmClient>,
    template: PromptTemplate,
    timeout: Option<Duration>,
}

impl GenerateNode {
    /// Uses the default RAG template.
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            template: PromptTemplate::default(),
            timeout: None,
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Node<AgentState> for GenerateNode {
    fn id(&self) -> &str {
        GENERATE
    }

    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        let mut state = state;

        if state.docs().is_empty() {
            debug!("no documents, skipping llm");
            state.answer = Some(NO_INFORMATION_ANSWER.to_string());
            state.confidence_score = Some(0.0);
            state.record_step(GENERATE);
            return Ok((state, Next::Continue));
        }

        let prompt = self
            .template
            .format(&format_context(state.docs()), state.question());

        match bounded(self.timeout, self.llm.generate(&prompt)).await {
            Ok(answer) => {
                let confidence = generation_confidence(state.retrieval_score, &answer);
                debug!(answer_chars = answer.chars().count(), confidence, "generated");
                state.confidence_score = Some(confidence);
                state.answer = Some(answer);
            }
            Err(e) => {
                warn!(error = %e, "generation failed");
                state.error = Some(format!("generation failed: {}", e));
                state.answer = Some(GENERATION_FALLBACK_ANSWER.to_string());
                state.confidence_score = Some(0.0);
            }
        }

        state.record_step(GENERATE);
        Ok((state, Next::Continue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::llm::MockLlm;

    fn state_with_docs(docs: Vec<Document>, score: Option<f64>) -> AgentState {
        let mut state = AgentState::new("What is Rust?", 5).unwrap();
        state.retrieved_docs = Some(docs);
        state.retrieval_score = score;
        state
    }

    /// **Scenario**: Confidence blends retrieval score and answer length deterministically.
    #[test]
    fn confidence_blend() {
        let long = "x".repeat(250);
        assert!((generation_confidence(Some(0.8125), &long) - 0.8875).abs() < 1e-9);
        assert!((generation_confidence(Some(1.0), &"y".repeat(50)) - 0.8).abs() < 1e-9);
        // Absent retrieval score counts as 0.5.
        assert!((generation_confidence(None, "") - 0.3).abs() < 1e-9);
        // Length is measured in characters, not bytes.
        assert!((generation_confidence(Some(0.0), &"é".repeat(50)) - 0.2).abs() < 1e-9);
    }

    /// **Scenario**: No documents gives the fixed answer without calling the LLM.
    #[tokio::test]
    async fn empty_docs_skip_llm() {
        let llm = MockLlm::new("never");
        let node = GenerateNode::new(Arc::new(llm.clone()));
        let (out, _) = node.run(state_with_docs(vec![], Some(0.0))).await.unwrap();
        assert_eq!(out.answer.as_deref(), Some(NO_INFORMATION_ANSWER));
        assert_eq!(out.confidence_score, Some(0.0));
        assert_eq!(llm.call_count(), 0);
        assert_eq!(out.step_count(), 1);

        let (absent, _) = node
            .run(AgentState::new("q", 5).unwrap())
            .await
            .unwrap();
        assert_eq!(absent.answer.as_deref(), Some(NO_INFORMATION_ANSWER));
        assert_eq!(llm.call_count(), 0);
    }

    /// **Scenario**: The prompt carries the labelled context and the question.
    #[tokio::test]
    async fn prompt_contains_context_and_question() {
        let llm = MockLlm::new("Rust is a systems language.");
        let node = GenerateNode::new(Arc::new(llm.clone()));
        let docs = vec![Document::new("Rust is fast."), Document::new("Rust is safe.")];
        let (out, _) = node.run(state_with_docs(docs, Some(1.0))).await.unwrap();
        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("[Document 1]\nRust is fast.\n\n[Document 2]\nRust is safe."));
        assert!(prompt.contains("What is Rust?"));
        assert_eq!(out.answer.as_deref(), Some("Rust is a systems language."));
        assert!(out.confidence_score.unwrap() > 0.6);
    }

    /// **Scenario**: A custom template replaces the default.
    #[tokio::test]
    async fn custom_template_is_used() {
        let llm = MockLlm::new("ok");
        let template = PromptTemplate::new("Q: {question}\nC: {context}").unwrap();
        let node = GenerateNode::new(Arc::new(llm.clone())).with_template(template);
        node.run(state_with_docs(vec![Document::new("c")], None))
            .await
            .unwrap();
        assert_eq!(llm.prompts()[0], "Q: What is Rust?\nC: [Document 1]\nc");
    }

    /// **Scenario**: An LLM failure is caught into error with the fallback answer.
    #[tokio::test]
    async fn llm_failure_is_caught() {
        let node = GenerateNode::new(Arc::new(MockLlm::failing("rate limited")));
        let (out, next) = node
            .run(state_with_docs(vec![Document::new("c")], Some(0.9)))
            .await
            .unwrap();
        assert_eq!(next, Next::Continue);
        assert!(out.error.as_deref().unwrap().contains("rate limited"));
        assert_eq!(out.answer.as_deref(), Some(GENERATION_FALLBACK_ANSWER));
        assert_eq!(out.confidence_score, Some(0.0));
        assert_eq!(out.step_count(), 1);
    }
}
