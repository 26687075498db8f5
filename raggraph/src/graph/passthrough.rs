//! Passthrough node: returns the state unchanged.
//!
//! Used as a routing gate: a conditional edge needs a source node, and a gate
//! lets the decision function run without spending a step.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::AgentError;

use super::{Next, Node};

/// Node that forwards the state untouched and continues.
pub struct PassthroughNode {
    id: String,
}

impl PassthroughNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl<S> Node<S> for PassthroughNode
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, state: S) -> Result<(S, Next), AgentError> {
        Ok((state, Next::Continue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: The gate hands back the same state and asks to continue.
    #[tokio::test]
    async fn passthrough_returns_state_unchanged() {
        let gate = PassthroughNode::new("decide");
        assert_eq!(Node::<i32>::id(&gate), "decide");
        let (s, next) = gate.run(7i32).await.unwrap();
        assert_eq!(s, 7);
        assert_eq!(next, Next::Continue);
    }
}
