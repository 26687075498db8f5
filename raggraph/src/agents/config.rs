//! Agent configuration shared by every preset.
//!
//! Callers (e.g. raggraph-cli) fill this from their own config (env, CLI
//! args) and pass it to `build_agent` / `RagAgent::new`.

use std::time::Duration;

use thiserror::Error;

use crate::prompt::PromptTemplate;
use crate::state::DEFAULT_MAX_STEPS;

pub const DEFAULT_TOP_K: usize = 4;
pub const DEFAULT_MAX_REFINEMENTS: u32 = 2;

/// Invalid agent configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("k must be greater than zero")]
    ZeroTopK,
    #[error("max_steps must be greater than zero")]
    ZeroMaxSteps,
    #[error("step timeout must be greater than zero")]
    ZeroTimeout,
    #[error("recursion limit must be greater than zero")]
    ZeroRecursionLimit,
}

/// Knobs of the agent presets.
///
/// Not every preset reads every field: `max_refinements` only matters to the
/// self-reflective preset, the two toggles only to the advanced one.
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Documents requested per retrieval.
    pub k: usize,
    /// Step budget of each run (initial `AgentState::max_steps`).
    pub max_steps: u32,
    /// Upper bound on refinement rounds (self-reflective).
    pub max_refinements: u32,
    /// Put rewrite_query in front of retrieve (advanced).
    pub enable_query_rewrite: bool,
    /// Score the answer after generation (advanced).
    pub enable_evaluation: bool,
    /// Generate through `LlmClient::stream_generate` so fragments reach the
    /// run's stream as `StreamEvent::Messages`.
    pub stream_generation: bool,
    /// Template of the generation step.
    pub prompt_template: PromptTemplate,
    /// Bound on each LLM / retriever call; `None` waits indefinitely.
    pub step_timeout: Option<Duration>,
    /// Hard cap on node executions per run, on top of `max_steps`.
    pub recursion_limit: Option<usize>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_TOP_K,
            max_steps: DEFAULT_MAX_STEPS,
            max_refinements: DEFAULT_MAX_REFINEMENTS,
            enable_query_rewrite: true,
            enable_evaluation: true,
            stream_generation: false,
            prompt_template: PromptTemplate::default(),
            step_timeout: None,
            recursion_limit: None,
        }
    }
}

impl AgentConfig {
    /// Rejects values no run could work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k == 0 {
            return Err(ConfigError::ZeroTopK);
        }
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        if self.step_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.recursion_limit == Some(0) {
            return Err(ConfigError::ZeroRecursionLimit);
        }
        Ok(())
    }
}
