//! Conditional routing: closed route enums and their routing tables.
//!
//! A decision function returns a value of a `Route` enum; the routing table
//! maps every variant to a node id or `END`. Because `Route::all` lists every
//! variant, `StateGraph::compile` can reject a table with a missing entry
//! before the graph ever runs.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use tracing::debug;

use crate::error::AgentError;

/// Closed set of labels a decision function can return.
pub trait Route: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Every variant of the enum.
    fn all() -> &'static [Self];

    /// Stable label used in logs and graph introspection.
    fn as_str(&self) -> &'static str;
}

type RouteFn<S> = Arc<dyn Fn(&S) -> &'static str + Send + Sync>;

/// Type-erased decision function plus its routing table.
pub(crate) struct ConditionalRouter<S> {
    route: RouteFn<S>,
    /// Route label -> target node id (or END).
    pub(crate) path_map: HashMap<&'static str, String>,
    /// All labels the decision function can return.
    pub(crate) labels: Vec<&'static str>,
}

impl<S> Clone for ConditionalRouter<S> {
    fn clone(&self) -> Self {
        Self {
            route: Arc::clone(&self.route),
            path_map: self.path_map.clone(),
            labels: self.labels.clone(),
        }
    }
}

impl<S> ConditionalRouter<S>
where
    S: 'static,
{
    pub(crate) fn new<R, F, T>(decision: F, path_map: impl IntoIterator<Item = (R, T)>) -> Self
    where
        R: Route,
        F: Fn(&S) -> R + Send + Sync + 'static,
        T: Into<String>,
    {
        let path_map = path_map
            .into_iter()
            .map(|(r, t)| (r.as_str(), t.into()))
            .collect();
        Self {
            route: Arc::new(move |s: &S| decision(s).as_str()),
            path_map,
            labels: R::all().iter().map(|r| r.as_str()).collect(),
        }
    }

    /// Labels with no entry in the routing table.
    pub(crate) fn unmapped(&self) -> Vec<&'static str> {
        self.labels
            .iter()
            .copied()
            .filter(|l| !self.path_map.contains_key(l))
            .collect()
    }

    /// Calls the decision function and maps its route to a target id.
    pub(crate) fn resolve(&self, node_id: &str, state: &S) -> Result<String, AgentError> {
        let label = (self.route)(state);
        debug!(node = node_id, route = label, "conditional route");
        self.path_map
            .get(label)
            .cloned()
            .ok_or_else(|| AgentError::UnmappedRoute {
                node: node_id.to_string(),
                route: label.to_string(),
            })
    }
}
