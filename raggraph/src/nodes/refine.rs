//! Refine node: asks the LLM to improve the current answer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::document::join_contents;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::state::AgentState;

use super::{bounded, REFINE};

/// Builds the refinement prompt. Confidence is printed with two decimals.
pub fn refine_prompt(question: &str, answer: &str, confidence: f64, context: &str) -> String {
    format!(
        "Original question: {question}\n\n\
         Current answer: {answer}\n\n\
         Current confidence: {confidence:.2}\n\n\
         Context: {context}\n\n\
         Improve the answer above so that it is:\n\
         1. more accurate and complete\n\
         2. clearer and better structured\n\
         3. making better use of the context\n\n\
         Improved answer:"
    )
}

/// Refine node.
///
/// **Interaction**: Implements `Node<AgentState>`; loop body of the
/// self-reflective preset (`evaluate -> refine -> evaluate`). Writes `answer`,
/// `error` and both counters.
pub struct RefineNode {
    llm: Arc<dyn LlmClient>,
    timeout: Option<Duration>,
}

impl RefineNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm, timeout: None }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Node<AgentState> for RefineNode {
    fn id(&self) -> &str {
        REFINE
    }

    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        let mut state = state;
        let prompt = refine_prompt(
            state.question(),
            state.answer.as_deref().unwrap_or(""),
            state.confidence_score.unwrap_or(0.0),
            &join_contents(state.docs()),
        );

        match bounded(self.timeout, self.llm.generate(&prompt)).await {
            Ok(answer) => {
                debug!(round = state.refinement_count() + 1, "refined");
                state.answer = Some(answer);
            }
            // The previous answer stays in place.
            Err(e) => {
                warn!(error = %e, "refinement failed");
                state.error = Some(format!("refinement failed: {}", e));
            }
        }

        state.record_refinement();
        state.record_step(REFINE);
        Ok((state, Next::Continue))
    }
}
