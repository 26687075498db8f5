//! Node middleware: wraps each node run inside `CompiledStateGraph`.

use std::fmt::Debug;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::AgentError;

use super::Next;

/// Boxed future returned by the wrapped node run.
pub type NodeRunFuture<S> = Pin<Box<dyn Future<Output = Result<(S, Next), AgentError>> + Send>>;

/// The wrapped node run handed to `NodeMiddleware::around_run`.
pub type NodeRunFn<S> = Box<dyn FnOnce(S) -> NodeRunFuture<S> + Send>;

/// Middleware around each node run.
///
/// Implementations must call `inner(state)` at most once and return its result
/// (possibly after inspecting it). Attach with `StateGraph::with_middleware`.
#[async_trait]
pub trait NodeMiddleware<S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
{
    async fn around_run(
        &self,
        node_id: &str,
        state: S,
        inner: NodeRunFn<S>,
    ) -> Result<(S, Next), AgentError>;
}

/// Middleware that logs node enter/exit through `tracing`.
pub struct LoggingNodeMiddleware<S> {
    _state: PhantomData<fn() -> S>,
}

impl<S> Default for LoggingNodeMiddleware<S> {
    fn default() -> Self {
        Self {
            _state: PhantomData,
        }
    }
}

#[async_trait]
impl<S> NodeMiddleware<S> for LoggingNodeMiddleware<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    async fn around_run(
        &self,
        node_id: &str,
        state: S,
        inner: NodeRunFn<S>,
    ) -> Result<(S, Next), AgentError> {
        debug!(node = node_id, "enter node");
        let result = inner(state).await;
        match &result {
            Ok((_, next)) => debug!(node = node_id, ?next, "exit node"),
            Err(e) => warn!(node = node_id, error = %e, "node failed"),
        }
        result
    }
}
