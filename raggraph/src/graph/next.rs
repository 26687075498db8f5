//! Next step after a node runs.

/// What the runner does after a node returns.
///
/// Step nodes return `Continue` and let the graph's edges decide. `Node(id)`
/// and `End` let a node override routing for one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Next {
    /// Follow the node's outgoing edge (unconditional or conditional).
    Continue,
    /// Jump to the node with this id.
    Node(String),
    /// Stop the run and return the current state.
    End,
}
