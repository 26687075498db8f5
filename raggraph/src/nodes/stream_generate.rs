//! Stream-generate node: like generate, but the LLM answer arrives as
//! fragments that are forwarded to the run's stream while being collected.
//!
//! # Streaming Support
//!
//! When the run context has `StreamMode::Messages`, every fragment is sent as
//! `StreamEvent::Messages` tagged with this node's id. Without a context (plain
//! `invoke`) the fragments are only collected.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, warn};

use crate::document::format_context;
use crate::error::AgentError;
use crate::graph::{Next, Node, RunContext};
use crate::llm::LlmClient;
use crate::prompt::PromptTemplate;
use crate::state::AgentState;

use super::generate::generation_confidence;
use super::{bounded, STREAM_GENERATE};

/// Answer when retrieval found nothing.
pub const STREAM_NO_INFORMATION_ANSWER: &str = "No relevant information was found.";

/// Answer when streaming failed.
pub const STREAM_FALLBACK_ANSWER: &str = "An error occurred while generating the answer.";

/// Stream-generate node.
///
/// **Interaction**: Implements `Node<AgentState>` including `run_with_context`;
/// consumes `LlmClient::stream_generate`.
pub struct StreamGenerateNode {
    llm: Arc<dyn LlmClient>,
    template: PromptTemplate,
    timeout: Option<Duration>,
}

impl StreamGenerateNode {
    /// Uses the short streaming template.
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            template: PromptTemplate::streaming(),
            timeout: None,
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Bounds the whole stream, first fragment to last.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn collect(
        &self,
        prompt: &str,
        ctx: Option<&RunContext<AgentState>>,
    ) -> Result<String, AgentError> {
        let mut stream = self.llm.stream_generate(prompt).await?;
        let mut answer = String::new();
        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            if let Some(ctx) = ctx {
                ctx.emit_message(STREAM_GENERATE, &fragment).await;
            }
            answer.push_str(&fragment);
        }
        Ok(answer)
    }

    async fn generate(
        &self,
        state: AgentState,
        ctx: Option<&RunContext<AgentState>>,
    ) -> AgentState {
        let mut state = state;

        if state.docs().is_empty() {
            state.answer = Some(STREAM_NO_INFORMATION_ANSWER.to_string());
            state.confidence_score = Some(0.0);
            state.record_step(STREAM_GENERATE);
            return state;
        }

        let prompt = self
            .template
            .format(&format_context(state.docs()), state.question());

        match bounded(self.timeout, self.collect(&prompt, ctx)).await {
            Ok(answer) => {
                let confidence = generation_confidence(state.retrieval_score, &answer);
                debug!(answer_chars = answer.chars().count(), confidence, "stream generated");
                state.confidence_score = Some(confidence);
                state.answer = Some(answer);
            }
            Err(e) => {
                warn!(error = %e, "stream generation failed");
                state.error = Some(format!("stream generation failed: {}", e));
                state.answer = Some(STREAM_FALLBACK_ANSWER.to_string());
                state.confidence_score = Some(0.0);
            }
        }

        state.record_step(STREAM_GENERATE);
        state
    }
}

#[async_trait]
impl Node<AgentState> for StreamGenerateNode {
    fn id(&self) -> &str {
        STREAM_GENERATE
    }

    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        Ok((self.generate(state, None).await, Next::Continue))
    }

    async fn run_with_context(
        &self,
        state: AgentState,
        ctx: &RunContext<AgentState>,
    ) -> Result<(AgentState, Next), AgentError> {
        Ok((self.generate(state, Some(ctx)).await, Next::Continue))
    }
}
