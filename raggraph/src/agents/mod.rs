//! Preset RAG agents built from the step nodes and decision functions.
//!
//! `build_agent` compiles one of the four presets; `RagAgent` wraps the
//! compiled graph with initial-state construction, the unanswered fallback
//! and streaming.

mod config;
mod presets;
mod runner;

pub use config::{AgentConfig, ConfigError, DEFAULT_MAX_REFINEMENTS, DEFAULT_TOP_K};
pub use presets::{
    advanced_graph, build_agent, conditional_graph, preset_graph, self_reflective_graph,
    simple_graph, AgentKind, BuildError, ParseAgentKindError,
};
pub use runner::{RagAgent, RunError, ERROR_FALLBACK, UNANSWERED_FALLBACK};
