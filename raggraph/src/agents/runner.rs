//! RAG agent runner: encapsulates preset build, initial state, invoke and stream.
//!
//! Used by raggraph-cli and other callers that want an answer for a question
//! without wiring the graph by hand.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::info;

use crate::error::AgentError;
use crate::graph::{CompiledStateGraph, GraphInfo, LoggingNodeMiddleware, RunContext};
use crate::llm::LlmClient;
use crate::retriever::Retriever;
use crate::state::{AgentState, StateError};
use crate::stream::{StreamEvent, StreamMode};

use super::config::AgentConfig;
use super::presets::{build_agent, AgentKind, BuildError};

/// Answer filled in when a run ends without one (e.g. step budget spent
/// before generation).
pub const UNANSWERED_FALLBACK: &str =
    "Sorry, I was unable to produce an answer within the allowed number of steps.";

/// Answer filled in when a run ends without one because a step failed; the
/// step's message stays in `error`.
pub const ERROR_FALLBACK: &str =
    "Sorry, an error occurred while answering the question.";

/// Error type for `RagAgent` invoke/stream operations.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("build failed: {0}")]
    Build(#[from] BuildError),
    #[error("invalid initial state: {0}")]
    State(#[from] StateError),
    #[error("execution failed: {0}")]
    Execution(#[from] AgentError),
    #[error("run task failed: {0}")]
    Task(String),
}

/// Compiled preset plus the step budget for new runs.
///
/// # Example
///
/// ```ignore
/// let agent = RagAgent::new(AgentKind::Conditional, llm, retriever, &AgentConfig::default())?;
/// let state = agent.invoke("What is Rust?").await?;
/// println!("{}", state.answer.unwrap_or_default());
/// ```
#[derive(Clone)]
pub struct RagAgent {
    kind: AgentKind,
    graph: CompiledStateGraph<AgentState>,
    max_steps: u32,
}

impl RagAgent {
    /// Validates `config` and compiles the `kind` preset once.
    pub fn new(
        kind: AgentKind,
        llm: Arc<dyn LlmClient>,
        retriever: Arc<dyn Retriever>,
        config: &AgentConfig,
    ) -> Result<Self, BuildError> {
        Ok(Self {
            kind,
            graph: build_agent(kind, llm, retriever, config)?,
            max_steps: config.max_steps,
        })
    }

    /// Logs entry and exit of every node at debug level.
    pub fn with_node_logging(mut self) -> Self {
        self.graph = self
            .graph
            .with_middleware(Arc::new(LoggingNodeMiddleware::<AgentState>::default()));
        self
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    pub fn info(&self) -> GraphInfo {
        self.graph.info()
    }

    /// Runs the preset for `question` with the configured step budget.
    pub async fn invoke(&self, question: &str) -> Result<AgentState, RunError> {
        let state = AgentState::new(question, self.max_steps)?;
        self.invoke_state(state).await
    }

    /// Runs the preset from a caller-built state (conversation fields, metadata).
    pub async fn invoke_state(&self, state: AgentState) -> Result<AgentState, RunError> {
        let state = self.graph.invoke(state).await?;
        Ok(self.finish(state))
    }

    /// Runs the preset and hands every `StreamEvent` (values, updates and
    /// generated text fragments) to `on_event` as it happens. Returns the
    /// final state like `invoke`.
    pub async fn stream_with_callback<F>(
        &self,
        question: &str,
        mut on_event: F,
    ) -> Result<AgentState, RunError>
    where
        F: FnMut(StreamEvent<AgentState>),
    {
        let state = AgentState::new(question, self.max_steps)?;
        let (tx, mut rx) = mpsc::channel(128);
        let ctx = RunContext {
            stream_tx: Some(tx),
            stream_mode: HashSet::from(StreamMode::ALL),
        };

        // The sender lives in `ctx`, so the channel closes when the run ends.
        let graph = self.graph.clone();
        let run = tokio::spawn(async move { graph.invoke_with_context(state, &ctx).await });

        while let Some(event) = rx.recv().await {
            on_event(event);
        }

        let state = run.await.map_err(|e| RunError::Task(e.to_string()))??;
        Ok(self.finish(state))
    }

    fn finish(&self, mut state: AgentState) -> AgentState {
        if !state.has_answer() {
            info!(
                agent = %self.kind,
                steps = state.step_count(),
                error = state.error.as_deref().unwrap_or_default(),
                "run ended without an answer"
            );
            let fallback = if state.has_error() {
                ERROR_FALLBACK
            } else {
                UNANSWERED_FALLBACK
            };
            state.answer = Some(fallback.to_string());
        }
        state
    }
}
