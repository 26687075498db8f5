//! Agent execution error types.
//!
//! Returned by `Node::run`, `LlmClient` calls and `CompiledStateGraph::invoke`.
//! Recoverable step failures never surface here: step nodes encode them into
//! `AgentState::error` instead. What remains are transport errors from the
//! collaborators and graph wiring bugs caught at run time.

use thiserror::Error;

/// Agent execution error.
///
/// `ExecutionFailed` carries LLM / transport failures (caught by step nodes).
/// The routing variants are configuration bugs that `StateGraph::compile`
/// normally rejects earlier; the engine still fails fast if one slips through.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. LLM call failed).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// A decision function returned a route with no target in the routing table.
    #[error("route '{route}' from node '{node}' has no target")]
    UnmappedRoute { node: String, route: String },

    /// A node finished with `Next::Continue` but has no outgoing edge.
    #[error("node '{0}' has no outgoing edge")]
    MissingEdge(String),

    /// A jump target (`Next::Node`) is not a node of this graph.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// The optional recursion limit of the compiled graph was reached.
    #[error("recursion limit of {0} node executions reached")]
    RecursionLimit(usize),
}
