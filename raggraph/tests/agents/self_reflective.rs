//! Self-reflective preset: refinement is bounded by max_refinements.

use raggraph::{AgentConfig, AgentKind, Document, MockLlm, MockRetriever};

use crate::common::{agent, state};

fn config(max_refinements: u32) -> AgentConfig {
    AgentConfig {
        max_refinements,
        ..AgentConfig::default()
    }
}

/// **Scenario**: With confidence stuck low, exactly max_refinements rounds run.
#[tokio::test]
async fn refinement_rounds_are_bounded() {
    for max_refinements in 0..=4u32 {
        // A three-letter answer keeps evaluate well under the 0.8 threshold.
        let llm = MockLlm::new("meh");
        let retriever = MockRetriever::with_scores(&[0.9, 0.8, 0.85, 0.7]);
        let out = agent(
            AgentKind::SelfReflective,
            &llm,
            &retriever,
            &config(max_refinements),
        )
        .invoke(state("What is Python?", 20))
        .await
        .unwrap();

        assert_eq!(out.refinement_count(), max_refinements);
        assert_eq!(llm.call_count(), 1 + max_refinements as usize);
        assert_eq!(out.step_count(), 3 + 2 * max_refinements);
        assert!(out.confidence_score.unwrap() < 0.8);
    }
}

/// **Scenario**: A confident first answer is not refined.
#[tokio::test]
async fn confident_answer_is_kept() {
    // Long, and repeats the question: evaluate scores it at 1.0.
    let llm = MockLlm::new(format!("What is Python? {}", "x".repeat(120)));
    let docs = (0..4).map(|i| Document::new(format!("d{}", i))).collect();
    let out = agent(
        AgentKind::SelfReflective,
        &llm,
        &MockRetriever::new(docs),
        &config(2),
    )
    .invoke(state("What is Python?", 5))
    .await
    .unwrap();

    assert_eq!(out.refinement_count(), 0);
    assert_eq!(llm.call_count(), 1);
    assert!(out.confidence_score.unwrap() >= 0.8);
}

/// **Scenario**: A generation error stops the loop before any refinement.
#[tokio::test]
async fn generation_error_skips_refinement() {
    let llm = MockLlm::failing("down");
    let out = agent(
        AgentKind::SelfReflective,
        &llm,
        &MockRetriever::with_scores(&[0.9]),
        &config(3),
    )
    .invoke(state("q", 5))
    .await
    .unwrap();

    assert!(out.has_error());
    assert_eq!(out.refinement_count(), 0);
    assert_eq!(out.step_count(), 3);
}

/// **Scenario**: Refinement replaces the answer with the latest LLM output.
#[tokio::test]
async fn refined_answer_replaces_draft() {
    let llm = MockLlm::with_replies(["draft", "better", "best"]);
    let out = agent(
        AgentKind::SelfReflective,
        &llm,
        &MockRetriever::with_scores(&[0.5]),
        &config(2),
    )
    .invoke(state("q", 5))
    .await
    .unwrap();

    assert_eq!(out.refinement_count(), 2);
    assert_eq!(out.answer.as_deref(), Some("best"));
}
