//! # raggraph
//!
//! Retrieval-augmented generation agents built as state graphs. One
//! `AgentState` per question flows through step nodes (retrieve, generate,
//! evaluate, refine, …); conditional edges route on that state until a
//! decision function says `End`.
//!
//! ## Design Principles
//!
//! - **Single state type**: every node reads and writes `AgentState`; there
//!   are no separate input/output types.
//! - **Failures are data**: a step that fails records `AgentState::error`
//!   and returns normally; every decision function routes to `End` once it is set.
//! - **Closed routes**: decision functions return enums (`Decision`,
//!   `RefineDecision`, `ContinueDecision`); `StateGraph::compile` rejects a
//!   routing table that misses a variant.
//! - **Bounded loops**: loops end through `max_steps` (`decide`) or
//!   `max_refinements` (`should_refine`).
//!
//! ## Main Modules
//!
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, `Next`, `Route`: build and run state graphs.
//! - [`nodes`]: the step nodes and decision functions of the RAG agents.
//! - [`agents`]: the four presets (`build_agent`) and the `RagAgent` runner.
//! - [`chain`]: graph-free `RagChain` and `ConversationalRagChain`.
//! - [`llm`]: `LlmClient` trait, `MockLlm`, and `ChatOpenAI` behind the `openai` feature.
//! - [`retriever`]: `Retriever` / `Embedder` traits, `MockRetriever`, `InMemoryVectorStore`.
//!
//! ## Features
//!
//! - `in-memory-vector` (default): `InMemoryVectorStore` (cosine similarity over `dashmap`).
//! - `openai`: `ChatOpenAI` and `OpenAIEmbedder` via `async-openai`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use raggraph::{AgentConfig, AgentKind, Document, MockLlm, MockRetriever, RagAgent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let llm = Arc::new(MockLlm::new("Rust is a systems programming language."));
//! let retriever = Arc::new(MockRetriever::new(vec![
//!     Document::new("Rust is fast and memory-safe.").with_score(0.9),
//! ]));
//! let agent = RagAgent::new(AgentKind::Conditional, llm, retriever, &AgentConfig::default())
//!     .unwrap();
//! let state = agent.invoke("What is Rust?").await.unwrap();
//! println!("{}", state.answer.unwrap_or_default());
//! # }
//! ```

pub mod agents;
pub mod chain;
pub mod document;
pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod nodes;
pub mod prompt;
pub mod retriever;
pub mod state;
pub mod stream;

pub use agents::{
    build_agent, AgentConfig, AgentKind, BuildError, ConfigError, ParseAgentKindError, RagAgent,
    RunError, ERROR_FALLBACK, UNANSWERED_FALLBACK,
};
pub use chain::{ConversationalRagChain, RagChain};
pub use document::Document;
pub use error::AgentError;
pub use graph::{
    CompilationError, CompiledStateGraph, GraphInfo, Next, Node, NodeMiddleware, Route,
    StateGraph, END, START,
};
pub use llm::{LlmClient, MockLlm, TextStream};
#[cfg(feature = "openai")]
pub use llm::ChatOpenAI;
pub use message::Message;
pub use nodes::{
    decide, should_continue, should_refine, within_step_budget, ContinueDecision, Decision,
    RefineDecision,
};
pub use prompt::{PromptTemplate, TemplateError};
#[cfg(feature = "in-memory-vector")]
pub use retriever::InMemoryVectorStore;
#[cfg(feature = "openai")]
pub use retriever::OpenAIEmbedder;
pub use retriever::{Embedder, MockRetriever, RetrievalError, Retriever};
pub use state::{AgentState, StateError, DEFAULT_MAX_STEPS};
pub use stream::{StreamEvent, StreamMode};
