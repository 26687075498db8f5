//! Shared state of one agent run.
//!
//! `AgentState` is created once per question, moved through the graph node by
//! node and returned to the caller. Step nodes write the fields they own and
//! call `record_step` exactly once; decision functions only read it.
//!
//! The question and the loop counters are private: the question cannot change
//! after creation and the counters only move forward through `record_step` /
//! `record_refinement`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::document::Document;
use crate::message::Message;

/// Step budget used when the caller does not pick one.
pub const DEFAULT_MAX_STEPS: u32 = 5;

/// Invalid initial state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("question must not be empty")]
    EmptyQuestion,
    #[error("max_steps must be greater than zero")]
    ZeroMaxSteps,
}

/// State threaded through every node of a RAG agent graph.
///
/// **Interaction**: Built by `AgentState::new` (or `RagAgent::invoke`); flows
/// through `CompiledStateGraph<AgentState>`; read by `decide`,
/// `should_refine`, `should_continue`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    question: String,
    /// Final (or latest refined) answer. `None` means not answered yet.
    pub answer: Option<String>,
    /// `None`: retrieval not attempted. `Some(vec![])`: attempted, nothing found.
    pub retrieved_docs: Option<Vec<Document>>,
    /// Query actually used for retrieval; see `effective_query`.
    pub retrieval_query: Option<String>,
    pub retrieval_score: Option<f64>,
    pub confidence_score: Option<f64>,
    pub need_more_context: bool,
    step_count: u32,
    max_steps: u32,
    refinement_count: u32,
    /// Name of the most recently executed step.
    pub current_node: Option<String>,
    /// Set when a step caught a failure; decision functions route to END once set.
    pub error: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// Prior turns of the conversation, oldest first.
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl AgentState {
    /// Creates the initial state for `question`.
    ///
    /// Rejects a blank question and a zero step budget.
    pub fn new(question: impl Into<String>, max_steps: u32) -> Result<Self, StateError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(StateError::EmptyQuestion);
        }
        if max_steps == 0 {
            return Err(StateError::ZeroMaxSteps);
        }
        Ok(Self {
            question,
            answer: None,
            retrieved_docs: None,
            retrieval_query: None,
            retrieval_score: None,
            confidence_score: None,
            need_more_context: false,
            step_count: 0,
            max_steps,
            refinement_count: 0,
            current_node: None,
            error: None,
            metadata: HashMap::new(),
            conversation_id: None,
            messages: Vec::new(),
        })
    }

    pub fn with_conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    pub fn refinement_count(&self) -> u32 {
        self.refinement_count
    }

    /// Query for retrieval: `retrieval_query` when set, else the question.
    pub fn effective_query(&self) -> &str {
        self.retrieval_query.as_deref().unwrap_or(&self.question)
    }

    /// Marks one executed step: bumps `step_count`, sets `current_node`.
    pub fn record_step(&mut self, node: &str) {
        self.step_count += 1;
        self.current_node = Some(node.to_string());
    }

    /// Marks one refinement round. Does not count as a step.
    pub fn record_refinement(&mut self) {
        self.refinement_count += 1;
    }

    /// True once the step budget is spent.
    pub fn step_limit_reached(&self) -> bool {
        self.step_count >= self.max_steps
    }

    /// True when a non-empty answer is present.
    pub fn has_answer(&self) -> bool {
        self.answer.as_deref().is_some_and(|a| !a.is_empty())
    }

    /// True when a non-empty error is present.
    pub fn has_error(&self) -> bool {
        self.error.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// Retrieved documents, or an empty slice when retrieval has not run.
    pub fn docs(&self) -> &[Document] {
        self.retrieved_docs.as_deref().unwrap_or(&[])
    }
}
