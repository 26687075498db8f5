//! Conditional preset: decide gate ⇄ {retrieve, generate}.

use raggraph::nodes::{DECIDE, GENERATE, NO_INFORMATION_ANSWER, RETRIEVE};
use raggraph::{decide, AgentConfig, AgentKind, Decision, MockLlm, MockRetriever};

use crate::common::{agent, state, updates};

/// **Scenario**: decide says retrieve first, then generate once documents are in.
#[tokio::test]
async fn decide_loop_retrieves_then_generates() {
    let llm = MockLlm::new("Python is a language.");
    let retriever = MockRetriever::with_scores(&[0.9, 0.8, 0.85, 0.7]);
    let graph = agent(AgentKind::Conditional, &llm, &retriever, &AgentConfig::default());

    let initial = state("What is Python?", 5);
    assert_eq!(decide(&initial), Decision::Retrieve);

    let trace = updates(&graph, initial).await;
    let order: Vec<_> = trace.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(order, vec![DECIDE, RETRIEVE, DECIDE, GENERATE, DECIDE]);

    let (_, after_retrieve) = &trace[1];
    assert!(!after_retrieve.docs().is_empty());
    assert_eq!(decide(after_retrieve), Decision::Generate);

    let (_, last) = trace.last().unwrap();
    assert_eq!(last.step_count(), 2);
    assert_eq!(llm.call_count(), 1);
    assert_eq!(retriever.call_count(), 1);
}

/// **Scenario**: Weak retrieval still goes straight to generate; there is no second retrieval.
#[tokio::test]
async fn weak_retrieval_generates_without_retrying() {
    let llm = MockLlm::new("Best effort answer.");
    let retriever = MockRetriever::with_scores(&[0.3, 0.2]);
    let out = agent(AgentKind::Conditional, &llm, &retriever, &AgentConfig::default())
        .invoke(state("q", 5))
        .await
        .unwrap();

    assert!(out.need_more_context);
    assert_eq!(retriever.call_count(), 1);
    assert_eq!(out.answer.as_deref(), Some("Best effort answer."));
}

/// **Scenario**: Nothing found: generate gives the fixed answer without calling the LLM.
#[tokio::test]
async fn empty_retrieval_ends_with_fixed_answer() {
    let llm = MockLlm::new("never");
    let out = agent(
        AgentKind::Conditional,
        &llm,
        &MockRetriever::empty(),
        &AgentConfig::default(),
    )
    .invoke(state("q", 5))
    .await
    .unwrap();

    assert_eq!(out.answer.as_deref(), Some(NO_INFORMATION_ANSWER));
    assert_eq!(llm.call_count(), 0);
}

/// **Scenario**: After a retrieval error the gate ends the run without generating.
#[tokio::test]
async fn retrieval_error_ends_run() {
    let llm = MockLlm::new("never");
    let out = agent(
        AgentKind::Conditional,
        &llm,
        &MockRetriever::failing("boom"),
        &AgentConfig::default(),
    )
    .invoke(state("q", 5))
    .await
    .unwrap();

    assert!(out.has_error());
    assert!(out.answer.is_none());
    assert_eq!(out.step_count(), 1);
    assert_eq!(llm.call_count(), 0);
}
