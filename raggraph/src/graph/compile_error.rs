//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when the graph is wired wrong. These are
//! programmer errors in graph construction, reported before any node runs.

use thiserror::Error;

/// Error when compiling a state graph.
///
/// Validation ensures every id in edges (except START/END) exists, there is
/// exactly one entry point, every node has exactly one way out, and every
/// route of every decision function has a target.
#[derive(Debug, Error)]
pub enum CompilationError {
    /// A node id in an edge was not registered via `add_node` (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No edge has from_id == START.
    #[error("graph must have an entry point (edge from START)")]
    MissingStart,

    /// Neither an edge nor a conditional route leads to END.
    #[error("graph must have at least one path to END")]
    MissingEnd,

    /// Edge structure is invalid (e.g. two entry points, two edges out of one node).
    #[error("invalid graph structure: {0}")]
    InvalidChain(String),

    /// A node has both an outgoing `add_edge` and `add_conditional_edges`.
    #[error("node '{0}' has both an edge and conditional edges")]
    NodeHasBothEdgeAndConditional(String),

    /// A routing table targets an id that is neither a node nor END.
    #[error("conditional route target not found: {0}")]
    InvalidConditionalPathMap(String),

    /// A decision function can return a route the routing table does not map.
    #[error("route '{route}' from node '{node}' has no target")]
    UnmappedRoute { node: String, route: String },

    /// A node has no outgoing edge, so the run could never leave it.
    #[error("node '{0}' has no outgoing edge")]
    NodeWithoutOutgoingEdge(String),
}
