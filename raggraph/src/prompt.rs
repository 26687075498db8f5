//! Prompt templates with `{context}`, `{question}` and `{history}` placeholders.
//!
//! Substitution is a single left-to-right pass, so placeholder-looking text
//! inside the substituted values is never expanded again.

use thiserror::Error;

pub const CONTEXT: &str = "context";
pub const QUESTION: &str = "question";
pub const HISTORY: &str = "history";

/// Default template of the generate step and `RagChain`.
pub const DEFAULT_RAG_TEMPLATE: &str = "You are a precise assistant. Answer the user's question using only the context below.

## Context
{context}

## Question
{question}

## Guidelines
1. Answer only from the context; do not invent facts.
2. If the context does not contain the answer, say so plainly.
3. Keep the answer complete, clear and well structured.

## Answer
";

/// Shorter default used by the stream-generate step.
pub const DEFAULT_STREAM_TEMPLATE: &str = "Answer the question based on the context below.

Context:
{context}

Question: {question}

Answer:";

/// Default template of `ConversationalRagChain`.
pub const DEFAULT_CONVERSATIONAL_TEMPLATE: &str = "You are a precise assistant in a multi-turn conversation. Use the conversation history to resolve references such as pronouns, and answer only from the context.

## Conversation history
{history}

## Context
{context}

## Current question
{question}

## Answer
";

/// Template validation failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template is missing the {{{0}}} placeholder")]
    MissingPlaceholder(&'static str),
}

/// Validated prompt template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Template that must contain `{context}` and `{question}`.
    pub fn new(text: impl Into<String>) -> Result<Self, TemplateError> {
        Self::with_required(text.into(), &[CONTEXT, QUESTION])
    }

    /// Template that must also contain `{history}`.
    pub fn conversational(text: impl Into<String>) -> Result<Self, TemplateError> {
        Self::with_required(text.into(), &[HISTORY, CONTEXT, QUESTION])
    }

    fn with_required(text: String, required: &[&'static str]) -> Result<Self, TemplateError> {
        for name in required {
            if !text.contains(&format!("{{{}}}", name)) {
                return Err(TemplateError::MissingPlaceholder(name));
            }
        }
        Ok(Self { text })
    }

    /// The built-in streaming template.
    pub fn streaming() -> Self {
        Self {
            text: DEFAULT_STREAM_TEMPLATE.to_string(),
        }
    }

    /// The built-in conversational template.
    pub fn conversational_default() -> Self {
        Self {
            text: DEFAULT_CONVERSATIONAL_TEMPLATE.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Fills `{context}` and `{question}`.
    pub fn format(&self, context: &str, question: &str) -> String {
        self.render(&[(CONTEXT, context), (QUESTION, question)])
    }

    /// Fills `{history}`, `{context}` and `{question}`.
    pub fn format_with_history(&self, history: &str, context: &str, question: &str) -> String {
        self.render(&[(HISTORY, history), (CONTEXT, context), (QUESTION, question)])
    }

    /// Replaces each `{name}` with its value; unknown braces are left as they are.
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let replaced = after.find('}').and_then(|close| {
                let name = &after[..close];
                values
                    .iter()
                    .find(|(k, _)| *k == name)
                    .map(|(_, v)| (*v, close))
            });
            match replaced {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            text: DEFAULT_RAG_TEMPLATE.to_string(),
        }
    }
}
