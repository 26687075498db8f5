//! raggraph-cli library: reusable run logic for the `raggraph` binary and other crates.
//!
//! Reads OpenAI config from .env, indexes documents from disk into an
//! in-memory vector store and answers a question with one of the raggraph
//! agent presets.
//!
//! ## Usage
//!
//! ```rust,no_run,ignore
//! let state = raggraph_cli::run("What is Rust?").await?;
//! println!("{}", state.answer.unwrap_or_default());
//! ```

mod config;
mod documents;
mod run;

pub use config::{Error, RunConfig, RunOptions};
pub use documents::{
    load_documents, split_chunks, split_paragraphs, Chunking, CHUNK_KEY, DEFAULT_CHUNK_OVERLAP,
    DEFAULT_CHUNK_SIZE, PARAGRAPH_KEY, SOURCE_KEY,
};
pub use raggraph::{AgentKind, AgentState};
pub use run::run_agent;
#[cfg(feature = "openai")]
pub use run::{run, run_with_config, run_with_options};

#[cfg(test)]
mod tests;
