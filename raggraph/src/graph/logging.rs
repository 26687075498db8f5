//! Logging utilities for graph execution.
//!
//! Structured `tracing` events for graph start/stop, node execution and routing.

use tracing::{debug, error, info};

use crate::error::AgentError;
use crate::graph::Next;

/// Log node execution start.
pub fn log_node_start(node_id: &str) {
    debug!(node_id = node_id, "Starting node execution");
}

/// Log node execution completion.
pub fn log_node_complete(node_id: &str, next: &Next) {
    debug!(node_id = node_id, ?next, "Node execution complete");
}

/// Log the transition chosen after a node.
pub fn log_transition(from: &str, to: &str) {
    debug!(from = from, to = to, "Transition");
}

/// Log graph execution start.
pub fn log_graph_start(entry: &str) {
    info!(entry = entry, "Starting graph execution");
}

/// Log graph execution completion.
pub fn log_graph_complete(executed: usize) {
    info!(executed, "Graph execution complete");
}

/// Log graph execution error.
pub fn log_graph_error(error: &AgentError) {
    error!(?error, "Graph execution error");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_functions() {
        // These should not panic
        log_node_start("test_node");
        log_node_complete("test_node", &Next::End);
        log_transition("a", "b");
        log_graph_start("a");
        log_graph_complete(2);
        log_graph_error(&AgentError::ExecutionFailed("test".to_string()));
    }
}
