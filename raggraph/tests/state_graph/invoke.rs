//! StateGraph invoke: run order, conditional loops, early stop, recursion limit.

use std::sync::Arc;

use raggraph::{AgentError, Next, StateGraph, END, START};

use crate::common::{Lap, Trace, VisitNode};

#[tokio::test]
async fn linear_chain_runs_in_edge_order() {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("first", Arc::new(VisitNode::new("first")))
        .add_node("second", Arc::new(VisitNode::new("second")))
        .add_node("third", Arc::new(VisitNode::new("third")))
        .add_edge(START, "first")
        .add_edge("first", "second")
        .add_edge("second", "third")
        .add_edge("third", END);

    let out = graph.compile().unwrap().invoke(Trace::default()).await.unwrap();
    assert_eq!(out.visited, vec!["first", "second", "third"]);
}

/// **Scenario**: A cycle runs until its decision function returns the exit route.
#[tokio::test]
async fn conditional_loop_exits_on_decision() {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("work", Arc::new(VisitNode::new("work")))
        .set_entry_point("work")
        .add_conditional_edges(
            "work",
            |s: &Trace| if s.laps("work") < 3 { Lap::Again } else { Lap::Done },
            [(Lap::Again, "work"), (Lap::Done, END)],
        );

    let out = graph.compile().unwrap().invoke(Trace::default()).await.unwrap();
    assert_eq!(out.laps("work"), 3);
}

/// **Scenario**: Next::End from a node stops the run before its edge is followed.
#[tokio::test]
async fn next_end_stops_early() {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("stop", Arc::new(VisitNode::returning("stop", Next::End)))
        .add_node("never", Arc::new(VisitNode::new("never")))
        .add_edge(START, "stop")
        .add_edge("stop", "never")
        .add_edge("never", END);

    let out = graph.compile().unwrap().invoke(Trace::default()).await.unwrap();
    assert_eq!(out.visited, vec!["stop"]);
}

/// **Scenario**: A loop that never exits is cut off by the recursion limit.
#[tokio::test]
async fn recursion_limit_stops_endless_loop() {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("spin", Arc::new(VisitNode::new("spin")))
        .set_entry_point("spin")
        .add_conditional_edges(
            "spin",
            |_: &Trace| Lap::Again,
            [(Lap::Again, "spin"), (Lap::Done, END)],
        );

    let compiled = graph.compile().unwrap().with_recursion_limit(10);
    match compiled.invoke(Trace::default()).await {
        Err(AgentError::RecursionLimit(limit)) => assert_eq!(limit, 10),
        other => panic!("expected RecursionLimit, got {:?}", other.map(|s| s.visited)),
    }
}
