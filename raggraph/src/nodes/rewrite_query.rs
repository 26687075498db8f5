//! Rewrite-query node: sets `retrieval_query` before retrieval.
//!
//! Third-person pronouns are detected but not yet resolved against the
//! conversation history; the question is forwarded unchanged. Real
//! coreference resolution can replace `rewrite` without touching the graph.

use async_trait::async_trait;
use tracing::debug;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::state::AgentState;

use super::REWRITE_QUERY;

const ENGLISH_PRONOUNS: &[&str] = &[
    "he", "she", "it", "they", "him", "her", "its", "their", "them",
];
const CJK_PRONOUNS: &[char] = &['它', '他', '她'];

/// True when `question` contains a third-person pronoun (whole English word,
/// case-insensitive, or one of the CJK pronoun characters).
pub fn has_third_person_pronoun(question: &str) -> bool {
    if question.chars().any(|c| CJK_PRONOUNS.contains(&c)) {
        return true;
    }
    question
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.trim_matches('\'').to_lowercase())
        .any(|w| ENGLISH_PRONOUNS.contains(&w.as_str()))
}

/// Rewrite-query node.
///
/// **Interaction**: Implements `Node<AgentState>`; optional entry of the
/// advanced preset. Reads `question` and `messages`, writes `retrieval_query`.
#[derive(Default)]
pub struct RewriteQueryNode;

impl RewriteQueryNode {
    pub fn new() -> Self {
        Self
    }

    fn rewrite(&self, state: &AgentState) -> String {
        let question = state.question();
        if has_third_person_pronoun(question) {
            debug!(
                history = state.messages.len(),
                "pronoun detected, forwarding question unchanged"
            );
        }
        question.to_string()
    }
}

#[async_trait]
impl Node<AgentState> for RewriteQueryNode {
    fn id(&self) -> &str {
        REWRITE_QUERY
    }

    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        let mut state = state;
        state.retrieval_query = Some(self.rewrite(&state));
        state.record_step(REWRITE_QUERY);
        Ok((state, Next::Continue))
    }
}
