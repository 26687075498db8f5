//! Compiled state graph: immutable, supports invoke and stream.
//!
//! Built by `StateGraph::compile`. Holds nodes, the entry point and, per node,
//! what follows it: a fixed target or a conditional router.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::AgentError;
use crate::stream::{StreamEvent, StreamMode};

use super::info::{GraphEdge, GraphInfo};
use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_transition,
};
use super::node_middleware::NodeMiddleware;
use super::route::ConditionalRouter;
use super::{Next, Node, RunContext, END, START};

/// What runs after a node.
pub(crate) enum NextEntry<S> {
    /// Single outgoing edge (`add_edge`).
    Unconditional(String),
    /// Decision function plus routing table (`add_conditional_edges`).
    Conditional(ConditionalRouter<S>),
}

impl<S> Clone for NextEntry<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Unconditional(to) => Self::Unconditional(to.clone()),
            Self::Conditional(router) => Self::Conditional(router.clone()),
        }
    }
}

/// Compiled graph: immutable structure, supports invoke and stream.
///
/// Created by `StateGraph::compile()`. Runs from the entry point; after each
/// node either honors the `Next` the node returned (`End`, `Node(id)`) or, on
/// `Continue`, follows the node's edge or conditional route. Cheap to clone:
/// nodes are `Arc`-shared, so concurrent runs share the graph but never a state.
#[derive(Clone)]
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) entry: String,
    pub(super) next_map: HashMap<String, NextEntry<S>>,
    /// Optional node middleware; set via `StateGraph::with_middleware`.
    pub(super) middleware: Option<Arc<dyn NodeMiddleware<S>>>,
    /// Maximum node executions per run; `None` means unbounded.
    pub(super) recursion_limit: Option<usize>,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Caps the number of node executions per run. Exceeding it fails the run
    /// with `AgentError::RecursionLimit`.
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = Some(limit);
        self
    }

    /// Wraps every node run in `middleware`, replacing any attached before.
    pub fn with_middleware(mut self, middleware: Arc<dyn NodeMiddleware<S>>) -> Self {
        self.middleware = Some(middleware);
        self
    }

    /// Entry node id.
    pub fn entry_point(&self) -> &str {
        &self.entry
    }

    /// Runs one node, through the middleware when one is attached.
    async fn run_node(
        &self,
        node_id: &str,
        state: S,
        run_ctx: Option<&RunContext<S>>,
    ) -> Result<(S, Next), AgentError> {
        let node = self
            .nodes
            .get(node_id)
            .cloned()
            .ok_or_else(|| AgentError::NodeNotFound(node_id.to_string()))?;

        if let Some(middleware) = &self.middleware {
            let run_ctx_owned = run_ctx.cloned();
            middleware
                .around_run(
                    node_id,
                    state,
                    Box::new(move |s| {
                        Box::pin(async move {
                            match run_ctx_owned.as_ref() {
                                Some(ctx) => node.run_with_context(s, ctx).await,
                                None => node.run(s).await,
                            }
                        })
                    }),
                )
                .await
        } else if let Some(ctx) = run_ctx {
            node.run_with_context(state, ctx).await
        } else {
            node.run(state).await
        }
    }

    /// Picks the node that follows `node_id`, given the state it produced.
    fn resolve_next(&self, node_id: &str, next: Next, state: &S) -> Result<String, AgentError> {
        match next {
            Next::End => Ok(END.to_string()),
            Next::Node(id) => Ok(id),
            Next::Continue => match self.next_map.get(node_id) {
                Some(NextEntry::Unconditional(to)) => Ok(to.clone()),
                Some(NextEntry::Conditional(router)) => router.resolve(node_id, state),
                None => Err(AgentError::MissingEdge(node_id.to_string())),
            },
        }
    }

    /// Shared run loop used by invoke() and stream(): steps through nodes until END.
    async fn run_loop(&self, state: S, run_ctx: Option<&RunContext<S>>) -> Result<S, AgentError> {
        let mut state = state;
        let mut current_id = self.entry.clone();
        let mut executed = 0usize;
        log_graph_start(&current_id);

        loop {
            if let Some(limit) = self.recursion_limit {
                if executed >= limit {
                    return Err(AgentError::RecursionLimit(limit));
                }
            }

            log_node_start(&current_id);
            let (new_state, next) = self.run_node(&current_id, state, run_ctx).await?;
            state = new_state;
            executed += 1;
            log_node_complete(&current_id, &next);

            if let Some(ctx) = run_ctx {
                if let Some(tx) = &ctx.stream_tx {
                    if ctx.stream_mode.contains(&StreamMode::Values) {
                        let _ = tx.send(StreamEvent::Values(state.clone())).await;
                    }
                    if ctx.stream_mode.contains(&StreamMode::Updates) {
                        let _ = tx
                            .send(StreamEvent::Updates {
                                node_id: current_id.clone(),
                                state: state.clone(),
                            })
                            .await;
                    }
                }
            }

            let target = self.resolve_next(&current_id, next, &state)?;
            log_transition(&current_id, &target);
            if target == END {
                log_graph_complete(executed);
                return Ok(state);
            }
            current_id = target;
        }
    }

    /// Runs the graph with the given state until a node routes to END.
    ///
    /// - `Next::Continue`: follow the node's edge, or call its decision function
    ///   on the new state and look the route up in the routing table.
    /// - `Next::Node(id)`: run the node with that id next.
    /// - `Next::End`: stop and return current state.
    ///
    /// Node errors propagate unchanged.
    pub async fn invoke(&self, state: S) -> Result<S, AgentError> {
        self.run_loop(state, None).await.inspect_err(log_graph_error)
    }

    /// Like `invoke`, but nodes see `ctx` (stream sender and modes) and the
    /// loop emits Values/Updates events into it.
    pub async fn invoke_with_context(
        &self,
        state: S,
        ctx: &RunContext<S>,
    ) -> Result<S, AgentError> {
        self.run_loop(state, Some(ctx))
            .await
            .inspect_err(log_graph_error)
    }

    /// Streams graph execution, emitting events via channel-backed Stream.
    ///
    /// The run happens on a spawned task; the stream ends when the run does.
    /// The run's `Result` is not observable through the stream: a failed run is
    /// logged and ends it like a finished one. Callers that need the outcome
    /// pass their own `RunContext` to `invoke_with_context` and drain the
    /// channel alongside, as `RagAgent::stream_with_callback` does.
    pub fn stream(
        &self,
        state: S,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent<S>> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let run_ctx = RunContext {
            stream_tx: Some(tx),
            stream_mode: stream_mode.into(),
        };

        tokio::spawn(async move {
            // Already logged by invoke_with_context.
            let _ = graph.invoke_with_context(state, &run_ctx).await;
        });

        ReceiverStream::new(rx)
    }

    /// Static description of the graph: nodes, edges (conditional ones labelled
    /// with their route) and entry point.
    pub fn info(&self) -> GraphInfo {
        let mut nodes: Vec<String> = self.nodes.keys().cloned().collect();
        nodes.sort();

        let mut edges = Vec::new();
        for (from, entry) in &self.next_map {
            match entry {
                NextEntry::Unconditional(to) => edges.push(GraphEdge {
                    from: from.clone(),
                    to: to.clone(),
                    label: None,
                }),
                NextEntry::Conditional(router) => {
                    for label in &router.labels {
                        if let Some(to) = router.path_map.get(label) {
                            edges.push(GraphEdge {
                                from: from.clone(),
                                to: to.clone(),
                                label: Some(label.to_string()),
                            });
                        }
                    }
                }
            }
        }
        edges.sort_by(|a, b| (&a.from, &a.label).cmp(&(&b.from, &b.label)));
        edges.insert(
            0,
            GraphEdge {
                from: START.to_string(),
                to: self.entry.clone(),
                label: None,
            },
        );

        GraphInfo {
            nodes,
            edges,
            entry_point: self.entry.clone(),
        }
    }

    /// Mermaid flowchart of the graph.
    pub fn to_mermaid(&self) -> String {
        self.info().to_mermaid()
    }
}
