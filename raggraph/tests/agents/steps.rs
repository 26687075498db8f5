//! Every step node adds exactly one to step_count; the decide gate adds none.

use raggraph::nodes::DECIDE;
use raggraph::{AgentConfig, AgentKind, MockLlm, MockRetriever};

use crate::common::{agent, state, updates};

/// **Scenario**: Across all presets, each node update moves step_count by one and names the node.
#[tokio::test]
async fn each_step_counts_once() {
    let configs = [
        AgentConfig::default(),
        AgentConfig {
            stream_generation: true,
            max_refinements: 1,
            ..AgentConfig::default()
        },
    ];
    for config in &configs {
        for kind in AgentKind::all() {
            let llm = MockLlm::new("short");
            let retriever = MockRetriever::with_scores(&[0.9, 0.4]);
            let graph = agent(*kind, &llm, &retriever, config);

            let mut previous = 0;
            for (node_id, s) in updates(&graph, state("What is it?", 10)).await {
                if node_id == DECIDE {
                    assert_eq!(s.step_count(), previous, "{}: gate counted a step", kind);
                } else {
                    assert_eq!(s.step_count(), previous + 1, "{}: {}", kind, node_id);
                    assert_eq!(s.current_node.as_deref(), Some(node_id.as_str()));
                }
                previous = s.step_count();
            }
            assert!(previous > 0, "{} ran no steps", kind);
        }
    }
}
