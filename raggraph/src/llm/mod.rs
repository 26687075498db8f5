//! Language model client abstraction for the generate, stream-generate and
//! refine steps.
//!
//! A step hands the client one fully rendered prompt and gets text back, either
//! whole (`generate`) or as a stream of fragments (`stream_generate`).

mod mock;

#[cfg(feature = "openai")]
mod openai;

pub use mock::MockLlm;

#[cfg(feature = "openai")]
pub use openai::ChatOpenAI;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::AgentError;

/// Lazily produced text fragments of one completion.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, AgentError>> + Send>>;

/// LLM client: prompt in, text out.
///
/// Implementations: `MockLlm` (scripted replies), `ChatOpenAI` (real API,
/// feature `openai`). Transport failures are `AgentError::ExecutionFailed`;
/// step nodes catch them and record them in `AgentState::error`.
///
/// **Interaction**: Used by `GenerateNode`, `StreamGenerateNode`, `RefineNode`
/// and the chains in `crate::chain`.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// One completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, AgentError>;

    /// One completion for `prompt`, delivered as fragments.
    async fn stream_generate(&self, prompt: &str) -> Result<TextStream, AgentError>;
}
