//! Shared set-up for the agent tests.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use raggraph::{
    build_agent, AgentConfig, AgentKind, AgentState, CompiledStateGraph, Embedder, MockLlm,
    MockRetriever, RetrievalError, StreamEvent, StreamMode,
};

/// Compiles `kind` over the given mocks.
pub fn agent(
    kind: AgentKind,
    llm: &MockLlm,
    retriever: &MockRetriever,
    config: &AgentConfig,
) -> CompiledStateGraph<AgentState> {
    build_agent(
        kind,
        Arc::new(llm.clone()),
        Arc::new(retriever.clone()),
        config,
    )
    .unwrap()
}

pub fn state(question: &str, max_steps: u32) -> AgentState {
    AgentState::new(question, max_steps).unwrap()
}

/// Runs `graph` in Updates mode and returns (node id, state after node) pairs.
#[allow(dead_code)]
pub async fn updates(
    graph: &CompiledStateGraph<AgentState>,
    state: AgentState,
) -> Vec<(String, AgentState)> {
    graph
        .stream(state, [StreamMode::Updates])
        .filter_map(|event| async move {
            match event {
                StreamEvent::Updates { node_id, state } => Some((node_id, state)),
                _ => None,
            }
        })
        .collect()
        .await
}

const VOCABULARY: &[&str] = &["rust", "python", "memory", "snake", "language", "fast"];

/// One dimension per vocabulary word: 1.0 when the text mentions it.
pub struct KeywordEmbedder;

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        Ok(texts
            .iter()
            .map(|t| {
                let lower = t.to_lowercase();
                VOCABULARY
                    .iter()
                    .map(|w| if lower.contains(w) { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        VOCABULARY.len()
    }
}
