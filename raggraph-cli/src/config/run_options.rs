//! Optional overrides for a run (CLI flags or programmatic).
//!
//! Used by [`RunConfig::apply_options`](super::RunConfig::apply_options) and
//! [`run_with_options`](crate::run_with_options).

use std::path::PathBuf;

use raggraph::AgentKind;

/// Optional overrides for a run. Only set fields override the base config (from env).
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Preset to run.
    pub agent: Option<AgentKind>,
    /// Documents per retrieval.
    pub top_k: Option<usize>,
    pub max_steps: Option<u32>,
    pub max_refinements: Option<u32>,
    /// Sampling temperature (0–2).
    pub temperature: Option<f32>,
    /// Longest indexed document, in characters.
    pub chunk_size: Option<usize>,
    /// Characters shared by neighbouring chunks of one paragraph.
    pub chunk_overlap: Option<usize>,
    /// Files or directories to index; appended to those from env.
    pub docs: Vec<PathBuf>,
    /// Print generated text as it arrives.
    pub stream: bool,
    /// Log node enter/exit and print the config summary.
    pub verbose: bool,
}
