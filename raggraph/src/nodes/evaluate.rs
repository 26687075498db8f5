//! Evaluate node: re-scores the answer's confidence.
//!
//! Writes only `confidence_score`.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::debug;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::state::AgentState;

use super::generate::DEFAULT_RETRIEVAL_SCORE;
use super::EVALUATE;

/// 0.3 under 20 chars, 0.6 under 100, else 1.0.
fn length_bucket(answer: &str) -> f64 {
    match answer.chars().count() {
        n if n < 20 => 0.3,
        n if n < 100 => 0.6,
        _ => 1.0,
    }
}

/// Shared lowercase whitespace tokens over question tokens (denominator at least 1).
fn keyword_overlap(question: &str, answer: &str) -> f64 {
    let q: HashSet<String> = question.split_whitespace().map(str::to_lowercase).collect();
    let a: HashSet<String> = answer.split_whitespace().map(str::to_lowercase).collect();
    q.intersection(&a).count() as f64 / q.len().max(1) as f64
}

/// `length_bucket * 0.3 + retrieval_score * 0.5 + overlap * 0.2`.
///
/// An absent retrieval score counts as 0.5; an absent answer as "".
pub fn evaluate_confidence(question: &str, answer: Option<&str>, retrieval_score: Option<f64>) -> f64 {
    let answer = answer.unwrap_or("");
    length_bucket(answer) * 0.3
        + retrieval_score.unwrap_or(DEFAULT_RETRIEVAL_SCORE) * 0.5
        + keyword_overlap(question, answer) * 0.2
}

/// Evaluate node.
///
/// **Interaction**: Implements `Node<AgentState>`; used after generate in the
/// advanced preset and between generate/refine and `should_refine` in the
/// self-reflective preset.
#[derive(Default)]
pub struct EvaluateNode;

impl EvaluateNode {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Node<AgentState> for EvaluateNode {
    fn id(&self) -> &str {
        EVALUATE
    }

    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        let mut state = state;
        let confidence = evaluate_confidence(
            state.question(),
            state.answer.as_deref(),
            state.retrieval_score,
        );
        debug!(confidence, "evaluated");
        state.confidence_score = Some(confidence);
        state.record_step(EVALUATE);
        Ok((state, Next::Continue))
    }
}
