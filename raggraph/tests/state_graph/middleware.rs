//! Node middleware attached through StateGraph::with_middleware and
//! CompiledStateGraph::with_middleware.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use raggraph::graph::{LoggingNodeMiddleware, NodeRunFn};
use raggraph::{AgentError, Next, NodeMiddleware, StateGraph, END, START};

use crate::common::{Trace, VisitNode};

/// Records "before:<id>" / "after:<id>" around every node.
#[derive(Default)]
struct RecordingMiddleware {
    log: Mutex<Vec<String>>,
}

#[async_trait]
impl NodeMiddleware<Trace> for RecordingMiddleware {
    async fn around_run(
        &self,
        node_id: &str,
        state: Trace,
        inner: NodeRunFn<Trace>,
    ) -> Result<(Trace, Next), AgentError> {
        self.log.lock().unwrap().push(format!("before:{}", node_id));
        let result = inner(state).await;
        self.log.lock().unwrap().push(format!("after:{}", node_id));
        result
    }
}

fn two_step_graph() -> StateGraph<Trace> {
    let mut graph = StateGraph::<Trace>::new();
    graph
        .add_node("a", Arc::new(VisitNode::new("a")))
        .add_node("b", Arc::new(VisitNode::new("b")))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    graph
}

#[tokio::test]
async fn middleware_wraps_every_node_in_order() {
    let mw = Arc::new(RecordingMiddleware::default());
    let compiled = two_step_graph()
        .with_middleware(mw.clone())
        .compile()
        .unwrap();

    let out = compiled.invoke(Trace::default()).await.unwrap();
    assert_eq!(out.visited, vec!["a", "b"]);
    assert_eq!(
        *mw.log.lock().unwrap(),
        vec!["before:a", "after:a", "before:b", "after:b"]
    );
}

/// **Scenario**: Middleware attached after compile behaves the same; logging middleware is transparent.
#[tokio::test]
async fn middleware_on_compiled_graph() {
    let mw = Arc::new(RecordingMiddleware::default());
    let compiled = two_step_graph().compile().unwrap().with_middleware(mw.clone());
    compiled.invoke(Trace::default()).await.unwrap();
    assert_eq!(mw.log.lock().unwrap().len(), 4);

    let logged = two_step_graph()
        .compile()
        .unwrap()
        .with_middleware(Arc::new(LoggingNodeMiddleware::<Trace>::default()));
    let out = logged.invoke(Trace::default()).await.unwrap();
    assert_eq!(out.visited, vec!["a", "b"]);
}
