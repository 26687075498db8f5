//! Scripted LLM for tests and offline runs.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::trace;

use crate::error::AgentError;

use super::{LlmClient, TextStream};

/// Characters per fragment when streaming.
const DEFAULT_CHUNK_CHARS: usize = 8;

/// Mock LLM: returns a fixed reply (or a scripted sequence), counts calls and
/// can be told to fail.
///
/// Clones share the call counter and the script, so a test can keep one clone
/// and hand the other to a graph.
#[derive(Clone)]
pub struct MockLlm {
    reply: String,
    script: Arc<Mutex<VecDeque<String>>>,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
    failure: Option<String>,
    chunk_chars: usize,
}

impl MockLlm {
    /// Always replies with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
            failure: None,
            chunk_chars: DEFAULT_CHUNK_CHARS,
        }
    }

    /// Replies with each entry in order, then repeats the last one.
    pub fn with_replies<I, T>(replies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let script: VecDeque<String> = replies.into_iter().map(Into::into).collect();
        let last = script.back().cloned().unwrap_or_default();
        let mock = Self::new(last);
        *mock.script.lock().unwrap_or_else(|e| e.into_inner()) = script;
        mock
    }

    /// Every call fails with `ExecutionFailed(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new("")
        }
    }

    /// Sets the fragment size used by `stream_generate`.
    pub fn with_chunk_chars(mut self, chunk_chars: usize) -> Self {
        self.chunk_chars = chunk_chars.max(1);
        self
    }

    /// Number of `generate` + `stream_generate` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn next_reply(&self, prompt: &str) -> Result<String, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());
        trace!(prompt_chars = prompt.chars().count(), "mock llm call");
        if let Some(msg) = &self.failure {
            return Err(AgentError::ExecutionFailed(msg.clone()));
        }
        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        Ok(scripted.unwrap_or_else(|| self.reply.clone()))
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn generate(&self, prompt: &str) -> Result<String, AgentError> {
        self.next_reply(prompt)
    }

    async fn stream_generate(&self, prompt: &str) -> Result<TextStream, AgentError> {
        let reply = self.next_reply(prompt)?;
        let chars: Vec<char> = reply.chars().collect();
        let chunks: Vec<Result<String, AgentError>> = chars
            .chunks(self.chunk_chars)
            .map(|c| Ok(c.iter().collect()))
            .collect();
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}
