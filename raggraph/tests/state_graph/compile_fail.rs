//! StateGraph compile failure cases: unknown node, missing entry, unmapped route, etc.

use std::sync::Arc;

use raggraph::{CompilationError, StateGraph, END, START};

use crate::common::{Lap, Trace, VisitNode};

#[tokio::test]
async fn compile_fails_when_edge_refers_to_unknown_node() {
    let mut graph = StateGraph::<Trace>::new();
    graph.add_node("a", Arc::new(VisitNode::new("a")));
    graph.add_edge(START, "a");
    graph.add_edge("a", "missing");

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "missing"),
        _ => panic!("expected NodeNotFound"),
    }
}

#[tokio::test]
async fn compile_fails_without_entry_point() {
    let mut graph = StateGraph::<Trace>::new();
    graph.add_node("a", Arc::new(VisitNode::new("a")));
    graph.add_edge("a", END);

    assert!(matches!(graph.compile(), Err(CompilationError::MissingStart)));
}

/// **Scenario**: A routing table that forgets a route is rejected before running.
#[tokio::test]
async fn compile_fails_on_unmapped_route() {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("a", Arc::new(VisitNode::new("a")))
        .set_entry_point("a")
        .add_conditional_edges("a", |_: &Trace| Lap::Done, [(Lap::Done, END)]);

    match graph.compile() {
        Err(CompilationError::UnmappedRoute { node, route }) => {
            assert_eq!(node, "a");
            assert_eq!(route, "again");
        }
        _ => panic!("expected UnmappedRoute"),
    }
}

#[tokio::test]
async fn compile_fails_when_node_has_no_way_out() {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("a", Arc::new(VisitNode::new("a")))
        .add_node("b", Arc::new(VisitNode::new("b")))
        .add_edge(START, "a")
        .add_edge("a", END);

    match graph.compile() {
        Err(CompilationError::NodeWithoutOutgoingEdge(id)) => assert_eq!(id, "b"),
        _ => panic!("expected NodeWithoutOutgoingEdge"),
    }
}
