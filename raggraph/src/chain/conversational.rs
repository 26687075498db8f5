//! Multi-turn RAG chain: every prompt carries the earlier turns.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use futures::StreamExt;
use tracing::debug;

use crate::document::format_context;
use crate::error::AgentError;
use crate::llm::{LlmClient, TextStream};
use crate::prompt::PromptTemplate;
use crate::retriever::Retriever;

use super::rag_chain::{failed, single_item, wrap_stream, EMPTY_RETRIEVAL_ANSWER};

pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Rendered in place of `{history}` before the first turn.
pub const FIRST_TURN_HISTORY: &str = "(this is the first turn of the conversation)";

const FAILURE: &str = "conversational RAG query failed";

/// (question, answer) pairs, oldest first, capped at `max` entries.
#[derive(Debug)]
struct History {
    turns: VecDeque<(String, String)>,
    max: usize,
}

impl History {
    fn push(&mut self, question: String, answer: String) {
        self.turns.push_back((question, answer));
        while self.turns.len() > self.max {
            self.turns.pop_front();
        }
    }

    fn render(&self) -> String {
        if self.turns.is_empty() {
            return FIRST_TURN_HISTORY.to_string();
        }
        self.turns
            .iter()
            .map(|(q, a)| format!("User: {}\nAssistant: {}", q, a))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

type SharedHistory = Arc<Mutex<History>>;

fn lock(history: &SharedHistory) -> std::sync::MutexGuard<'_, History> {
    history.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `RagChain` with conversation memory.
///
/// Each completed turn is appended to the history; once it holds more than
/// `max_history` turns the oldest is dropped. Failed turns are not recorded.
///
/// **Interaction**: Shares `Retriever` / `LlmClient` with the graph agents;
/// the history lives in the chain, not in `AgentState`.
pub struct ConversationalRagChain {
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    template: PromptTemplate,
    history: SharedHistory,
}

impl ConversationalRagChain {
    /// Uses the default conversational template and keeps 100 turns.
    pub fn new(llm: Arc<dyn LlmClient>, retriever: Arc<dyn Retriever>) -> Self {
        Self {
            llm,
            retriever,
            template: PromptTemplate::conversational_default(),
            history: Arc::new(Mutex::new(History {
                turns: VecDeque::new(),
                max: DEFAULT_MAX_HISTORY,
            })),
        }
    }

    /// `template` should come from `PromptTemplate::conversational` so that
    /// `{history}` is present.
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_max_history(self, max_history: usize) -> Self {
        {
            let mut history = lock(&self.history);
            history.max = max_history;
            while history.turns.len() > max_history {
                history.turns.pop_front();
            }
        }
        self
    }

    /// Recorded turns, oldest first.
    pub fn history(&self) -> Vec<(String, String)> {
        lock(&self.history).turns.iter().cloned().collect()
    }

    /// Forgets every turn; the next query is a first turn again.
    pub fn clear_history(&self) {
        lock(&self.history).turns.clear();
    }

    fn record(&self, question: &str, answer: &str) {
        lock(&self.history).push(question.to_string(), answer.to_string());
    }

    /// Prompt for `question`, or `None` when retrieval found nothing.
    async fn prompt(&self, question: &str, k: usize) -> Result<Option<String>, AgentError> {
        let docs = self
            .retriever
            .search(question, k)
            .await
            .map_err(|e| failed(FAILURE, e))?;
        if docs.is_empty() {
            return Ok(None);
        }
        let history = lock(&self.history).render();
        debug!(found = docs.len(), turns = self.history().len(), "conversational prompt");
        Ok(Some(self.template.format_with_history(
            &history,
            &format_context(&docs),
            question,
        )))
    }

    /// Answers `question` in the context of earlier turns and records the turn.
    pub async fn query(&self, question: &str, k: usize) -> Result<String, AgentError> {
        let answer = match self.prompt(question, k).await? {
            Some(prompt) => self
                .llm
                .generate(&prompt)
                .await
                .map_err(|e| failed(FAILURE, e))?,
            None => EMPTY_RETRIEVAL_ANSWER.to_string(),
        };
        self.record(question, &answer);
        Ok(answer)
    }

    /// Like `query`, but streamed. The turn is recorded once the stream has
    /// been read to the end without error.
    pub async fn stream_query(&self, question: &str, k: usize) -> Result<TextStream, AgentError> {
        let Some(prompt) = self.prompt(question, k).await? else {
            self.record(question, EMPTY_RETRIEVAL_ANSWER);
            return Ok(single_item(EMPTY_RETRIEVAL_ANSWER));
        };
        let inner = self
            .llm
            .stream_generate(&prompt)
            .await
            .map_err(|e| failed(FAILURE, e))?;

        let turn = Turn {
            inner: wrap_stream(inner, FAILURE),
            question: question.to_string(),
            answer: String::new(),
            history: Arc::clone(&self.history),
        };
        let stream = futures::stream::unfold(Some(turn), |turn| async move {
            let mut turn = turn?;
            match turn.inner.next().await {
                Some(Ok(fragment)) => {
                    turn.answer.push_str(&fragment);
                    Some((Ok(fragment), Some(turn)))
                }
                Some(Err(e)) => Some((Err(e), None)),
                None => {
                    lock(&turn.history).push(turn.question, turn.answer);
                    None
                }
            }
        });
        Ok(Box::pin(stream))
    }
}

/// A streamed turn in progress.
struct Turn {
    inner: TextStream,
    question: String,
    answer: String,
    history: SharedHistory,
}
