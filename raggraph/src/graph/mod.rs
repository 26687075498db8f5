//! State graph: nodes, edges and conditional edges; compile, then invoke or stream.
//!
//! Add nodes and edges, route with closed `Route` enums, compile (the shape is
//! validated once), then invoke with state.

mod compile_error;
mod compiled;
mod info;
mod logging;
mod next;
mod node;
mod node_middleware;
mod passthrough;
mod route;
mod run_context;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use info::{GraphEdge, GraphInfo};
pub use next::Next;
pub use node::Node;
pub use node_middleware::{LoggingNodeMiddleware, NodeMiddleware, NodeRunFn, NodeRunFuture};
pub use passthrough::PassthroughNode;
pub use route::Route;
pub use run_context::RunContext;
pub use state_graph::{StateGraph, END, START};
