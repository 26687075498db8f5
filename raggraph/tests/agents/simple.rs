//! Simple preset: retrieve → generate → END.

use raggraph::nodes::NO_INFORMATION_ANSWER;
use raggraph::{AgentConfig, AgentKind, Document, MockLlm, MockRetriever};

use crate::common::{agent, state};

/// **Scenario**: Four scored documents give retrieval_score 0.8125, one LLM call, two steps.
#[tokio::test]
async fn reference_scenario() {
    let llm = MockLlm::new("Python is a high-level programming language.");
    let retriever = MockRetriever::with_scores(&[0.9, 0.8, 0.85, 0.7]);
    let graph = agent(AgentKind::Simple, &llm, &retriever, &AgentConfig::default());

    let out = graph.invoke(state("What is Python?", 5)).await.unwrap();

    assert!((out.retrieval_score.unwrap() - 0.8125).abs() < 1e-9);
    assert!(!out.need_more_context);
    assert_eq!(llm.call_count(), 1);
    assert_eq!(
        out.answer.as_deref(),
        Some("Python is a high-level programming language.")
    );
    assert_eq!(out.step_count(), 2);
    assert_eq!(out.docs().len(), 4);
    assert_eq!(retriever.queries(), vec!["What is Python?"]);
}

/// **Scenario**: Without scores the retrieval score is the fill ratio, 1.0 once k documents come back.
#[tokio::test]
async fn unscored_documents_use_density_proxy() {
    let llm = MockLlm::new("a");
    let two = MockRetriever::new(vec![Document::new("a"), Document::new("b")]);
    let out = agent(AgentKind::Simple, &llm, &two, &AgentConfig::default())
        .invoke(state("q", 5))
        .await
        .unwrap();
    assert!((out.retrieval_score.unwrap() - 0.5).abs() < 1e-9);

    let six = MockRetriever::new((0..6).map(|i| Document::new(format!("d{}", i))).collect());
    let out = agent(AgentKind::Simple, &llm, &six, &AgentConfig::default())
        .invoke(state("q", 5))
        .await
        .unwrap();
    assert_eq!(out.retrieval_score, Some(1.0));
    assert_eq!(out.docs().len(), 4);
}

/// **Scenario**: Empty retrieval gives the fixed answer and confidence 0 without an LLM call.
#[tokio::test]
async fn empty_retrieval_skips_llm() {
    let llm = MockLlm::new("never");
    let out = agent(
        AgentKind::Simple,
        &llm,
        &MockRetriever::empty(),
        &AgentConfig::default(),
    )
    .invoke(state("q", 5))
    .await
    .unwrap();

    assert_eq!(out.retrieved_docs, Some(vec![]));
    assert_eq!(out.answer.as_deref(), Some(NO_INFORMATION_ANSWER));
    assert_eq!(out.confidence_score, Some(0.0));
    assert_eq!(llm.call_count(), 0);
    assert_eq!(out.step_count(), 2);
}

/// **Scenario**: A failing retriever is recorded as error; the run still completes.
#[tokio::test]
async fn failed_retrieval_is_recorded() {
    let llm = MockLlm::new("never");
    let out = agent(
        AgentKind::Simple,
        &llm,
        &MockRetriever::failing("index offline"),
        &AgentConfig::default(),
    )
    .invoke(state("q", 5))
    .await
    .unwrap();

    assert!(out.error.as_deref().unwrap().contains("index offline"));
    assert!(out.need_more_context);
    assert_eq!(out.retrieval_score, Some(0.0));
    assert_eq!(llm.call_count(), 0);
}
