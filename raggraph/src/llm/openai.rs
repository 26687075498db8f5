//! OpenAI Chat Completions client implementing `LlmClient` (ChatOpenAI).
//!
//! Uses the real OpenAI Chat Completions API. Requires `OPENAI_API_KEY` (or
//! explicit config). Each prompt is sent as one user message, optionally
//! preceded by a system message.
//!
//! **Interaction**: Implements `LlmClient`; used by the generate, stream-generate
//! and refine steps like `MockLlm`. Depends on `async_openai` (feature `openai`).

use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

use crate::error::AgentError;
use crate::llm::{LlmClient, TextStream};

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
    Client,
};

/// OpenAI Chat Completions client implementing `LlmClient`.
///
/// Uses `OPENAI_API_KEY` from the environment by default; or provide
/// config via `ChatOpenAI::with_config` (custom key or base URL for
/// OpenAI-compatible servers).
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    system_prompt: Option<String>,
    temperature: Option<f32>,
}

impl ChatOpenAI {
    /// Build client with default config (API key from `OPENAI_API_KEY` env).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
            system_prompt: None,
            temperature: None,
        }
    }

    /// Build client with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            system_prompt: None,
            temperature: None,
        }
    }

    /// Sends `prompt` as a system message before every user prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set temperature (0-2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn request(&self, prompt: &str, stream: bool) -> Result<CreateChatCompletionRequest, AgentError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system_prompt {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage::from(system.as_str()),
            ));
        }
        messages.push(ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage::from(prompt),
        ));

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(messages);
        if stream {
            args.stream(true);
        }
        if let Some(t) = self.temperature {
            args.temperature(t);
        }
        args.build().map_err(|e| {
            AgentError::ExecutionFailed(format!("OpenAI request build failed: {}", e))
        })
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn generate(&self, prompt: &str) -> Result<String, AgentError> {
        let request = self.request(prompt, false)?;
        debug!(model = %self.model, "chat completion");

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("OpenAI API error: {}", e)))?;

        let choice =
            response.choices.into_iter().next().ok_or_else(|| {
                AgentError::ExecutionFailed("OpenAI returned no choices".to_string())
            })?;

        Ok(choice.message.content.unwrap_or_default())
    }

    async fn stream_generate(&self, prompt: &str) -> Result<TextStream, AgentError> {
        let request = self.request(prompt, true)?;
        debug!(model = %self.model, "streaming chat completion");

        let stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("OpenAI API error: {}", e)))?;

        let fragments = stream.filter_map(|chunk| async move {
            match chunk {
                Ok(response) => response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.delta.content)
                    .filter(|s| !s.is_empty())
                    .map(Ok),
                Err(e) => Some(Err(AgentError::ExecutionFailed(format!(
                    "OpenAI stream error: {}",
                    e
                )))),
            }
        });
        Ok(Box::pin(fragments))
    }
}
