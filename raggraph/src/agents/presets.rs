//! The four RAG agent graphs.
//!
//! | Preset | Shape |
//! |--------|-------|
//! | simple | retrieve → generate → END |
//! | conditional | decide gate ⇄ {retrieve, generate}, gate → END |
//! | advanced | [rewrite_query →] retrieve → decide gate → {retrieve, generate, END}; generate → [evaluate →] END |
//! | self_reflective | retrieve → generate → evaluate → {refine → evaluate, END} |
//!
//! The `*_graph` functions return the uncompiled `StateGraph` so callers can
//! attach middleware; `build_agent` validates the config, compiles and applies
//! the recursion limit.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::graph::{
    CompilationError, CompiledStateGraph, Node, PassthroughNode, StateGraph, END, START,
};
use crate::llm::LlmClient;
use crate::nodes::{
    decide, should_continue, should_refine, within_step_budget, ContinueDecision, Decision,
    EvaluateNode, GenerateNode, RefineDecision, RefineNode, RetrieveNode, RewriteQueryNode,
    StreamGenerateNode, DECIDE, EVALUATE, GENERATE, REFINE, RETRIEVE, REWRITE_QUERY,
    STREAM_GENERATE,
};
use crate::retriever::Retriever;
use crate::state::AgentState;

use super::config::{AgentConfig, ConfigError};

/// Which preset graph to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Simple,
    Conditional,
    Advanced,
    SelfReflective,
}

impl AgentKind {
    pub fn all() -> &'static [AgentKind] {
        &[
            AgentKind::Simple,
            AgentKind::Conditional,
            AgentKind::Advanced,
            AgentKind::SelfReflective,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Simple => "simple",
            AgentKind::Conditional => "conditional",
            AgentKind::Advanced => "advanced",
            AgentKind::SelfReflective => "self_reflective",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown preset name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown agent kind '{0}' (expected simple, conditional, advanced or self_reflective)")]
pub struct ParseAgentKindError(pub String);

impl FromStr for AgentKind {
    type Err = ParseAgentKindError;

    /// Case-insensitive; `-` is accepted in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        AgentKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| ParseAgentKindError(s.to_string()))
    }
}

/// Failure to build a preset.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid agent config: {0}")]
    Config(#[from] ConfigError),
    #[error("graph compilation failed: {0}")]
    Compilation(#[from] CompilationError),
}

fn retrieve_node(retriever: Arc<dyn Retriever>, config: &AgentConfig) -> Arc<dyn Node<AgentState>> {
    Arc::new(RetrieveNode::new(retriever, config.k).with_timeout(config.step_timeout))
}

/// Generation step and the id it is registered under.
fn generation_node(
    llm: Arc<dyn LlmClient>,
    config: &AgentConfig,
) -> (&'static str, Arc<dyn Node<AgentState>>) {
    let template = config.prompt_template.clone();
    if config.stream_generation {
        let node = StreamGenerateNode::new(llm)
            .with_template(template)
            .with_timeout(config.step_timeout);
        (STREAM_GENERATE, Arc::new(node))
    } else {
        let node = GenerateNode::new(llm)
            .with_template(template)
            .with_timeout(config.step_timeout);
        (GENERATE, Arc::new(node))
    }
}

/// Linear retrieve → generate → END. Always exactly two steps.
pub fn simple_graph(
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    config: &AgentConfig,
) -> StateGraph<AgentState> {
    let (generate_id, generate) = generation_node(llm, config);
    let mut graph = StateGraph::<AgentState>::new();
    graph
        .add_node(RETRIEVE, retrieve_node(retriever, config))
        .add_node(generate_id, generate)
        .add_edge(START, RETRIEVE)
        .add_edge(RETRIEVE, generate_id)
        .add_edge(generate_id, END);
    graph
}

/// Loop through the `decide` gate until `decide` returns `End`.
pub fn conditional_graph(
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    config: &AgentConfig,
) -> StateGraph<AgentState> {
    let (generate_id, generate) = generation_node(llm, config);
    let mut graph = StateGraph::<AgentState>::new();
    graph
        .add_node(DECIDE, Arc::new(PassthroughNode::new(DECIDE)))
        .add_node(RETRIEVE, retrieve_node(retriever, config))
        .add_node(generate_id, generate)
        .set_entry_point(DECIDE)
        .add_conditional_edges(
            DECIDE,
            decide,
            [
                (Decision::Retrieve, RETRIEVE),
                (Decision::Generate, generate_id),
                (Decision::End, END),
            ],
        )
        .add_edge(RETRIEVE, DECIDE)
        .add_edge(generate_id, DECIDE);
    graph
}

/// Retrieval first, then the `decide` gate; generation leaves the graph,
/// through evaluate when enabled.
///
/// The follow-up edges out of rewrite_query and generate are guarded by the
/// step budget, so a run never executes more than `max_steps` steps.
pub fn advanced_graph(
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    config: &AgentConfig,
) -> StateGraph<AgentState> {
    let (generate_id, generate) = generation_node(llm, config);
    let mut graph = StateGraph::<AgentState>::new();
    graph
        .add_node(RETRIEVE, retrieve_node(retriever, config))
        .add_node(generate_id, generate)
        .add_node(DECIDE, Arc::new(PassthroughNode::new(DECIDE)));

    if config.enable_query_rewrite {
        graph
            .add_node(REWRITE_QUERY, Arc::new(RewriteQueryNode::new()))
            .set_entry_point(REWRITE_QUERY)
            .add_conditional_edges(
                REWRITE_QUERY,
                should_continue,
                [
                    (ContinueDecision::Continue, RETRIEVE),
                    (ContinueDecision::End, END),
                ],
            );
    } else {
        graph.set_entry_point(RETRIEVE);
    }

    graph.add_edge(RETRIEVE, DECIDE).add_conditional_edges(
        DECIDE,
        decide,
        [
            (Decision::Retrieve, RETRIEVE),
            (Decision::Generate, generate_id),
            (Decision::End, END),
        ],
    );

    if config.enable_evaluation {
        graph
            .add_node(EVALUATE, Arc::new(EvaluateNode::new()))
            .add_conditional_edges(
                generate_id,
                within_step_budget,
                [
                    (ContinueDecision::Continue, EVALUATE),
                    (ContinueDecision::End, END),
                ],
            )
            .add_edge(EVALUATE, END);
    } else {
        graph.add_edge(generate_id, END);
    }
    graph
}

/// Generate, evaluate, and refine while confidence stays low, at most
/// `max_refinements` times.
pub fn self_reflective_graph(
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    config: &AgentConfig,
) -> StateGraph<AgentState> {
    let refine = RefineNode::new(Arc::clone(&llm)).with_timeout(config.step_timeout);
    let (generate_id, generate) = generation_node(llm, config);
    let mut graph = StateGraph::<AgentState>::new();
    graph
        .add_node(RETRIEVE, retrieve_node(retriever, config))
        .add_node(generate_id, generate)
        .add_node(EVALUATE, Arc::new(EvaluateNode::new()))
        .add_node(REFINE, Arc::new(refine))
        .set_entry_point(RETRIEVE)
        .add_edge(RETRIEVE, generate_id)
        .add_edge(generate_id, EVALUATE)
        .add_conditional_edges(
            EVALUATE,
            should_refine(config.max_refinements),
            [(RefineDecision::Refine, REFINE), (RefineDecision::End, END)],
        )
        .add_edge(REFINE, EVALUATE);
    graph
}

/// Uncompiled graph of `kind`, after validating `config`.
pub fn preset_graph(
    kind: AgentKind,
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    config: &AgentConfig,
) -> Result<StateGraph<AgentState>, ConfigError> {
    config.validate()?;
    Ok(match kind {
        AgentKind::Simple => simple_graph(llm, retriever, config),
        AgentKind::Conditional => conditional_graph(llm, retriever, config),
        AgentKind::Advanced => advanced_graph(llm, retriever, config),
        AgentKind::SelfReflective => self_reflective_graph(llm, retriever, config),
    })
}

/// Validates `config`, builds the `kind` preset and compiles it.
pub fn build_agent(
    kind: AgentKind,
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    config: &AgentConfig,
) -> Result<CompiledStateGraph<AgentState>, BuildError> {
    let compiled = preset_graph(kind, llm, retriever, config)?.compile()?;
    Ok(match config.recursion_limit {
        Some(limit) => compiled.with_recursion_limit(limit),
        None => compiled,
    })
}
