//! Conditional and advanced presets never execute more than `max_steps` steps.

use raggraph::{AgentConfig, AgentKind, MockLlm, MockRetriever};

use crate::common::{agent, state};

fn retrievers() -> Vec<(&'static str, MockRetriever)> {
    vec![
        ("strong", MockRetriever::with_scores(&[0.9, 0.8, 0.85, 0.7])),
        ("weak", MockRetriever::with_scores(&[0.2])),
        ("empty", MockRetriever::empty()),
        ("failing", MockRetriever::failing("down")),
    ]
}

fn llms() -> Vec<(&'static str, MockLlm)> {
    vec![
        ("ok", MockLlm::new("An answer.")),
        ("failing", MockLlm::failing("down")),
    ]
}

fn configs(kind: AgentKind) -> Vec<AgentConfig> {
    match kind {
        AgentKind::Advanced => [(true, true), (true, false), (false, true), (false, false)]
            .into_iter()
            .map(|(rewrite, evaluate)| AgentConfig {
                enable_query_rewrite: rewrite,
                enable_evaluation: evaluate,
                ..AgentConfig::default()
            })
            .collect(),
        _ => vec![AgentConfig::default()],
    }
}

/// **Scenario**: For budgets 1..=8 and every collaborator behaviour, step_count stays within max_steps.
#[tokio::test]
async fn runs_halt_within_step_budget() {
    for kind in [AgentKind::Conditional, AgentKind::Advanced] {
        for config in configs(kind) {
            for (r_name, retriever) in retrievers() {
                for (l_name, llm) in llms() {
                    let graph = agent(kind, &llm, &retriever, &config);
                    for max_steps in 1..=8 {
                        let out = graph.invoke(state("What is its purpose?", max_steps)).await.unwrap();
                        assert!(
                            out.step_count() <= max_steps,
                            "{} (rewrite={}, evaluate={}) retriever={} llm={} max_steps={} ran {} steps",
                            kind,
                            config.enable_query_rewrite,
                            config.enable_evaluation,
                            r_name,
                            l_name,
                            max_steps,
                            out.step_count()
                        );
                    }
                }
            }
        }
    }
}

/// **Scenario**: With enough budget the advanced preset runs rewrite, retrieve, generate, evaluate.
#[tokio::test]
async fn advanced_full_path_takes_four_steps() {
    let llm = MockLlm::new("It is used for systems programming.");
    let retriever = MockRetriever::with_scores(&[0.9, 0.8, 0.85, 0.7]);
    let out = agent(AgentKind::Advanced, &llm, &retriever, &AgentConfig::default())
        .invoke(state("What is its purpose?", 5))
        .await
        .unwrap();

    assert_eq!(out.step_count(), 4);
    assert_eq!(out.retrieval_query.as_deref(), Some("What is its purpose?"));
    assert_eq!(out.current_node.as_deref(), Some("evaluate"));
    assert!(out.confidence_score.is_some());
    assert_eq!(llm.call_count(), 1);
}

/// **Scenario**: A budget that runs out right after generation skips evaluation.
#[tokio::test]
async fn advanced_skips_evaluate_when_budget_is_spent() {
    let llm = MockLlm::new("answer");
    let retriever = MockRetriever::with_scores(&[0.9, 0.8, 0.85, 0.7]);
    let out = agent(AgentKind::Advanced, &llm, &retriever, &AgentConfig::default())
        .invoke(state("q", 3))
        .await
        .unwrap();

    assert_eq!(out.step_count(), 3);
    assert_eq!(out.current_node.as_deref(), Some("generate"));
    assert!(out.has_answer());
}
