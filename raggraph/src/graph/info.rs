//! Graph introspection: node list, edges with route labels, Mermaid output.

use serde::Serialize;

use super::{END, START};

/// One edge of a compiled graph. Conditional edges carry the route label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
}

/// Static description of a compiled graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphInfo {
    /// Node ids, sorted.
    pub nodes: Vec<String>,
    /// Edges including `START -> entry`, sorted by source then label.
    pub edges: Vec<GraphEdge>,
    pub entry_point: String,
}

impl GraphInfo {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Renders a Mermaid flowchart (top-down).
    pub fn to_mermaid(&self) -> String {
        let mut output = String::from("flowchart TD\n");
        output.push_str(&format!("    {}([start])\n", sanitize_id(START)));
        for name in &self.nodes {
            output.push_str(&format!("    {}[{}]\n", sanitize_id(name), name));
        }
        output.push_str(&format!("    {}([end])\n", sanitize_id(END)));
        output.push('\n');

        for edge in &self.edges {
            let from = sanitize_id(&edge.from);
            let to = sanitize_id(&edge.to);
            match &edge.label {
                Some(label) => output.push_str(&format!("    {} -->|{}| {}\n", from, label, to)),
                None => output.push_str(&format!("    {} --> {}\n", from, to)),
            }
        }
        output
    }
}

/// Mermaid ids cannot hold most punctuation, and lowercase `end` is a keyword.
fn sanitize_id(name: &str) -> String {
    match name {
        START => "START".to_string(),
        END => "END".to_string(),
        _ => name
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect(),
    }
}
