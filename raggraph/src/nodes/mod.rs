//! Step nodes and decision functions of the RAG agents.
//!
//! Every step node implements `Node<AgentState>`, owns a documented subset of
//! state fields, catches its own collaborator failures into
//! `AgentState::error`, and calls `record_step` exactly once per run. Decision
//! functions are plain `fn(&AgentState) -> Route` and never mutate state.

mod decide;
mod evaluate;
mod generate;
mod refine;
mod retrieve;
mod rewrite_query;
mod stream_generate;

pub use decide::{
    decide, should_continue, should_refine, within_step_budget, ContinueDecision, Decision,
    RefineDecision,
};
pub use evaluate::{evaluate_confidence, EvaluateNode};
pub use generate::{
    generation_confidence, GenerateNode, GENERATION_FALLBACK_ANSWER, NO_INFORMATION_ANSWER,
};
pub use refine::{refine_prompt, RefineNode};
pub use retrieve::{needs_more_context, retrieval_score, RetrieveNode};
pub use rewrite_query::{has_third_person_pronoun, RewriteQueryNode};
pub use stream_generate::{StreamGenerateNode, STREAM_FALLBACK_ANSWER, STREAM_NO_INFORMATION_ANSWER};

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

pub const RETRIEVE: &str = "retrieve";
pub const GENERATE: &str = "generate";
pub const STREAM_GENERATE: &str = "stream_generate";
pub const REWRITE_QUERY: &str = "rewrite_query";
pub const EVALUATE: &str = "evaluate";
pub const REFINE: &str = "refine";
/// Routing gate in front of `decide`.
pub const DECIDE: &str = "decide";

/// Awaits `fut`, bounded by `timeout` when one is set. Errors and timeouts
/// come back as a message for `AgentState::error`.
pub(crate) async fn bounded<F, T, E>(timeout: Option<Duration>, fut: F) -> Result<T, String>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(r) => r,
            Err(_) => return Err(format!("timed out after {:?}", limit)),
        },
        None => fut.await,
    };
    result.map_err(|e| e.to_string())
}
