//! Retrieve node: similarity search for the effective query.
//!
//! Writes `retrieved_docs`, `retrieval_score`, `need_more_context` and, on
//! failure, `error`. Never returns `Err`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::document::Document;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::retriever::Retriever;
use crate::state::AgentState;

use super::{bounded, RETRIEVE};

/// Score below which more context is wanted.
const MIN_RETRIEVAL_SCORE: f64 = 0.6;

/// Retrieval quality in [0, 1].
///
/// Mean of the documents' scores when the first one carries a score (missing
/// or non-finite scores count as 0, the mean is clamped to [0, 1]); otherwise
/// the share of the `k` requested documents that came back. No documents: 0.0.
pub fn retrieval_score(docs: &[Document], k: usize) -> f64 {
    let Some(first) = docs.first() else {
        return 0.0;
    };
    if first.score().is_some() {
        let total: f64 = docs
            .iter()
            .map(|d| d.score().filter(|s| s.is_finite()).unwrap_or(0.0))
            .sum();
        (total / docs.len() as f64).clamp(0.0, 1.0)
    } else {
        (docs.len() as f64 / k.max(1) as f64).min(1.0)
    }
}

/// Low score, or fewer than half (integer division) of the requested documents.
pub fn needs_more_context(score: f64, found: usize, k: usize) -> bool {
    score < MIN_RETRIEVAL_SCORE || found < k / 2
}

/// Retrieve node: runs `retriever.search(effective_query, k)`.
///
/// **Interaction**: Implements `Node<AgentState>`; first step of every preset.
pub struct RetrieveNode {
    retriever: Arc<dyn Retriever>,
    k: usize,
    timeout: Option<Duration>,
}

impl RetrieveNode {
    pub fn new(retriever: Arc<dyn Retriever>, k: usize) -> Self {
        Self {
            retriever,
            k,
            timeout: None,
        }
    }

    /// Bounds each search; a timeout is handled like any retrieval failure.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Node<AgentState> for RetrieveNode {
    fn id(&self) -> &str {
        RETRIEVE
    }

    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        let mut state = state;
        let query = state.effective_query().to_string();

        match bounded(self.timeout, self.retriever.search(&query, self.k)).await {
            Ok(docs) => {
                let score = retrieval_score(&docs, self.k);
                state.need_more_context = needs_more_context(score, docs.len(), self.k);
                debug!(
                    query = %query,
                    found = docs.len(),
                    score,
                    need_more_context = state.need_more_context,
                    "retrieved"
                );
                state.retrieval_score = Some(score);
                state.retrieved_docs = Some(docs);
            }
            Err(e) => {
                warn!(query = %query, error = %e, "retrieval failed");
                state.error = Some(format!("retrieval failed: {}", e));
                state.retrieved_docs = Some(Vec::new());
                state.retrieval_score = Some(0.0);
                state.need_more_context = true;
            }
        }

        state.record_step(RETRIEVE);
        Ok((state, Next::Continue))
    }
}
