//! State graph: nodes + explicit edges (from → to) and conditional edges.
//!
//! Add nodes with `add_node`, wire them with `add_edge(from, to)` using
//! `START` and `END` for entry/exit (or `set_entry_point`), and route on state
//! with `add_conditional_edges`. Then `compile` to get a `CompiledStateGraph`.
//!
//! # Conditional edges
//!
//! After the source node runs, its decision function is called on the updated
//! state. The decision returns a closed `Route` enum; the routing table maps
//! every variant to a node id or `END`. A node has either one outgoing edge or
//! conditional edges, never both. Cycles are allowed; loop termination is the
//! business of the decision functions, not of the graph.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::{CompiledStateGraph, NextEntry};
use crate::graph::node::Node;
use crate::graph::node_middleware::NodeMiddleware;
use crate::graph::route::{ConditionalRouter, Route};

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit (the terminal marker): use as a target in edges or routing tables.
pub const END: &str = "__end__";

/// State graph: nodes plus explicit edges and conditional edges.
///
/// Generic over state type `S`. Build with `add_node` / `add_edge` /
/// `add_conditional_edges`, then `compile()` to obtain an executable graph.
///
/// **Interaction**: Accepts `Arc<dyn Node<S>>`; produces `CompiledStateGraph<S>`.
/// Middleware is attached with `with_middleware` before compiling.
pub struct StateGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    /// Edges (from_id, to_id). At most one per source node.
    edges: Vec<(String, String)>,
    /// Conditional edges: source node id -> decision function and routing table.
    conditional_edges: HashMap<String, ConditionalRouter<S>>,
    /// Optional node middleware; `compile()` hands it to the compiled graph.
    middleware: Option<Arc<dyn NodeMiddleware<S>>>,
}

impl<S> Default for StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            conditional_edges: HashMap::new(),
            middleware: None,
        }
    }

    /// Attaches node middleware for fluent API. Chain with `compile()`:
    /// `graph.with_middleware(m).compile()?`.
    pub fn with_middleware(self, middleware: Arc<dyn NodeMiddleware<S>>) -> Self {
        Self {
            middleware: Some(middleware),
            ..self
        }
    }

    /// Adds a node; id must be unique. Replaces if same id.
    ///
    /// Returns `&mut Self` for method chaining.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Adds an edge from `from_id` to `to_id`.
    ///
    /// Use `START` for graph entry and `END` for graph exit. Both ids (except
    /// START/END) must be registered via `add_node` before `compile()`.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Sets the entry node. Same as `add_edge(START, id)`.
    pub fn set_entry_point(&mut self, id: impl Into<String>) -> &mut Self {
        self.add_edge(START, id)
    }

    /// Adds conditional edges from `source`: after `source` runs, `decision`
    /// is called with the updated state and its route is looked up in `path_map`.
    ///
    /// Every variant of `R` must appear in `path_map`; targets must be node ids
    /// or `END`. Both are checked by `compile()`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// graph.add_conditional_edges(
    ///     "decide",
    ///     decide,
    ///     [
    ///         (Decision::Retrieve, "retrieve"),
    ///         (Decision::Generate, "generate"),
    ///         (Decision::End, END),
    ///     ],
    /// );
    /// ```
    pub fn add_conditional_edges<R, F, T>(
        &mut self,
        source: impl Into<String>,
        decision: F,
        path_map: impl IntoIterator<Item = (R, T)>,
    ) -> &mut Self
    where
        R: Route,
        F: Fn(&S) -> R + Send + Sync + 'static,
        T: Into<String>,
    {
        self.conditional_edges
            .insert(source.into(), ConditionalRouter::new(decision, path_map));
        self
    }

    /// Builds the executable graph after validating its structure.
    ///
    /// Returns `CompilationError` for unknown nodes, a missing or duplicated
    /// entry point, no path to END, nodes without (or with two) ways out, and
    /// routing tables that miss a route or target an unknown node.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        for (from, to) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            if to != END && !self.nodes.contains_key(to) {
                return Err(CompilationError::NodeNotFound(to.clone()));
            }
        }
        for (source, router) in &self.conditional_edges {
            if !self.nodes.contains_key(source) {
                return Err(CompilationError::NodeNotFound(source.clone()));
            }
            if let Some(route) = router.unmapped().first() {
                return Err(CompilationError::UnmappedRoute {
                    node: source.clone(),
                    route: route.to_string(),
                });
            }
            for target in router.path_map.values() {
                if target != END && !self.nodes.contains_key(target) {
                    return Err(CompilationError::InvalidConditionalPathMap(target.clone()));
                }
            }
        }

        let start_edges: Vec<_> = self
            .edges
            .iter()
            .filter(|(f, _)| f == START)
            .map(|(_, t)| t.clone())
            .collect();
        let entry = match start_edges.as_slice() {
            [] => return Err(CompilationError::MissingStart),
            [only] => only.clone(),
            _ => {
                return Err(CompilationError::InvalidChain(
                    "multiple edges from START".into(),
                ))
            }
        };
        if entry == END {
            return Err(CompilationError::InvalidChain(
                "entry point cannot be END".into(),
            ));
        }

        let has_end = self.edges.iter().any(|(_, t)| t == END)
            || self
                .conditional_edges
                .values()
                .any(|r| r.path_map.values().any(|v| v == END));
        if !has_end {
            return Err(CompilationError::MissingEnd);
        }

        let mut edge_froms = HashSet::new();
        for (from, _) in self.edges.iter().filter(|(f, _)| f != START) {
            if !edge_froms.insert(from.clone()) {
                return Err(CompilationError::InvalidChain(format!(
                    "duplicate edge from '{}'",
                    from
                )));
            }
            if self.conditional_edges.contains_key(from) {
                return Err(CompilationError::NodeHasBothEdgeAndConditional(
                    from.clone(),
                ));
            }
        }

        let mut node_ids: Vec<_> = self.nodes.keys().cloned().collect();
        node_ids.sort();
        for id in &node_ids {
            if !edge_froms.contains(id) && !self.conditional_edges.contains_key(id) {
                return Err(CompilationError::NodeWithoutOutgoingEdge(id.clone()));
            }
        }

        let mut next_map: HashMap<String, NextEntry<S>> = self
            .edges
            .into_iter()
            .filter(|(f, _)| f != START)
            .map(|(f, t)| (f, NextEntry::Unconditional(t)))
            .collect();
        for (source, router) in self.conditional_edges {
            next_map.insert(source, NextEntry::Conditional(router));
        }

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            entry,
            next_map,
            middleware: self.middleware,
            recursion_limit: None,
        })
    }
}
