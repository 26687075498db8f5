//! Streaming types for graph runs.
//!
//! Defines stream modes and events for value, update and message streaming.
//! Used by `CompiledStateGraph::stream` and by nodes that emit incremental
//! text (the stream-generate step).

use std::fmt::Debug;

/// Which kinds of events a run emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Full state after each node.
    Values,
    /// Node id plus state after each node.
    Updates,
    /// Text fragments from the stream-generate step.
    Messages,
}

impl StreamMode {
    pub const ALL: [StreamMode; 3] = [StreamMode::Values, StreamMode::Updates, StreamMode::Messages];
}

/// Where a streamed fragment came from.
#[derive(Clone, Debug)]
pub struct StreamMetadata {
    pub node_id: String,
}

/// One fragment of generated text.
#[derive(Clone, Debug)]
pub struct MessageChunk {
    pub content: String,
}

/// Event emitted while a graph runs. Sent only for the modes the run asked for.
#[derive(Clone, Debug)]
pub enum StreamEvent<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    Values(S),
    Updates { node_id: String, state: S },
    Messages {
        chunk: MessageChunk,
        metadata: StreamMetadata,
    },
}

impl<S> StreamEvent<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Node that produced the event; `None` for `Values`.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            StreamEvent::Values(_) => None,
            StreamEvent::Updates { node_id, .. } => Some(node_id),
            StreamEvent::Messages { metadata, .. } => Some(&metadata.node_id),
        }
    }

    /// Text of a `Messages` event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Messages { chunk, .. } => Some(&chunk.content),
            _ => None,
        }
    }
}
