//! Shared state and nodes for the StateGraph tests.

use async_trait::async_trait;
use raggraph::{AgentError, Next, Node, Route};

/// Records which nodes ran, in order.
#[derive(Clone, Debug, Default)]
pub struct Trace {
    pub visited: Vec<String>,
}

impl Trace {
    pub fn laps(&self, id: &str) -> usize {
        self.visited.iter().filter(|v| *v == id).count()
    }
}

/// Appends its id to the trace and continues (or returns a fixed `Next`).
pub struct VisitNode {
    id: String,
    next: Next,
}

impl VisitNode {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            next: Next::Continue,
        }
    }

    pub fn returning(id: &str, next: Next) -> Self {
        Self {
            id: id.to_string(),
            next,
        }
    }
}

#[async_trait]
impl Node<Trace> for VisitNode {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, state: Trace) -> Result<(Trace, Next), AgentError> {
        let mut state = state;
        state.visited.push(self.id.clone());
        Ok((state, self.next.clone()))
    }
}

/// Loop-or-stop route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lap {
    Again,
    Done,
}

impl Route for Lap {
    fn all() -> &'static [Self] {
        &[Lap::Again, Lap::Done]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Lap::Again => "again",
            Lap::Done => "done",
        }
    }
}
