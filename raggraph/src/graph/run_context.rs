//! Run context passed into nodes for streaming-aware execution.
//!
//! Holds the optional stream sender plus the selected stream modes.

use std::collections::HashSet;
use std::fmt::Debug;

use tokio::sync::mpsc;

use crate::stream::{MessageChunk, StreamEvent, StreamMetadata, StreamMode};

#[derive(Clone)]
pub struct RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Optional sender for streaming events.
    pub stream_tx: Option<mpsc::Sender<StreamEvent<S>>>,
    /// Enabled stream modes (Values, Updates, Messages).
    pub stream_mode: HashSet<StreamMode>,
}

impl<S> RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Context that streams nothing.
    pub fn silent() -> Self {
        Self {
            stream_tx: None,
            stream_mode: HashSet::new(),
        }
    }

    /// Sends one text fragment as `StreamEvent::Messages` when Messages mode is on.
    ///
    /// Returns false when the fragment was not delivered (mode off, no sender,
    /// or receiver dropped).
    pub async fn emit_message(&self, node_id: &str, content: &str) -> bool {
        if !self.stream_mode.contains(&StreamMode::Messages) {
            return false;
        }
        let Some(tx) = &self.stream_tx else {
            return false;
        };
        tx.send(StreamEvent::Messages {
            chunk: MessageChunk {
                content: content.to_string(),
            },
            metadata: StreamMetadata {
                node_id: node_id.to_string(),
            },
        })
        .await
        .is_ok()
    }
}
