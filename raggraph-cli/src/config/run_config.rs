//! Run config: OpenAI endpoint and models, preset and its knobs, documents to index.
//! Filled from env / .env, then overridden by [`RunOptions`](super::RunOptions).

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use raggraph::{AgentConfig, AgentKind, DEFAULT_MAX_STEPS};

use crate::documents::{Chunking, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

use super::RunOptions;

/// Error type used for config loading and runs.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Everything a CLI run needs.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// OpenAI API base URL, e.g. `https://api.openai.com/v1`.
    pub api_base: String,
    pub api_key: String,
    /// Chat model, e.g. `gpt-4o-mini`.
    pub model: String,
    /// Sampling temperature; unset uses the API default.
    pub temperature: Option<f32>,
    /// Embeddings model, e.g. `text-embedding-3-small`.
    pub embedding_model: String,
    pub agent: AgentKind,
    pub top_k: usize,
    pub max_steps: u32,
    pub max_refinements: u32,
    /// Files or directories whose paragraphs become the indexed documents.
    pub docs: Vec<PathBuf>,
    /// Longest indexed document, in characters; longer paragraphs are chunked.
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub stream: bool,
    pub verbose: bool,
}

impl RunConfig {
    /// Config with the given API key and every other field at its default.
    pub fn new(api_key: impl Into<String>) -> Self {
        let agent = AgentConfig::default();
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            agent: AgentKind::Conditional,
            top_k: agent.k,
            max_steps: DEFAULT_MAX_STEPS,
            max_refinements: agent.max_refinements,
            docs: Vec::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            stream: false,
            verbose: false,
        }
    }

    /// Fill config from env vars. Call `dotenv::dotenv().ok()` first to pick up `.env`.
    ///
    /// `OPENAI_API_KEY` required; `OPENAI_API_BASE`, `OPENAI_MODEL`, `EMBEDDING_MODEL` have defaults.
    /// `OPENAI_TEMPERATURE`, `RAG_AGENT`, `RAG_TOP_K`, `RAG_MAX_STEPS`, `RAG_MAX_REFINEMENTS`,
    /// `RAG_CHUNK_SIZE`, `RAG_CHUNK_OVERLAP` and `RAG_DOCS` (a path list, `:`-separated
    /// on Unix) are optional. A set but unparsable value is an error.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "OPENAI_API_KEY is not set; please configure it in .env",
            )
        })?;
        let mut config = Self::new(api_key);
        if let Ok(base) = std::env::var("OPENAI_API_BASE") {
            config.api_base = base;
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.model = model;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.embedding_model = model;
        }
        config.temperature = parsed_var("OPENAI_TEMPERATURE")?;
        if let Some(agent) = parsed_var("RAG_AGENT")? {
            config.agent = agent;
        }
        if let Some(k) = parsed_var("RAG_TOP_K")? {
            config.top_k = k;
        }
        if let Some(max_steps) = parsed_var("RAG_MAX_STEPS")? {
            config.max_steps = max_steps;
        }
        if let Some(max_refinements) = parsed_var("RAG_MAX_REFINEMENTS")? {
            config.max_refinements = max_refinements;
        }
        if let Some(size) = parsed_var("RAG_CHUNK_SIZE")? {
            config.chunk_size = size;
        }
        if let Some(overlap) = parsed_var("RAG_CHUNK_OVERLAP")? {
            config.chunk_overlap = overlap;
        }
        if let Some(docs) = std::env::var_os("RAG_DOCS") {
            config.docs = std::env::split_paths(&docs).collect();
        }
        Ok(config)
    }

    /// Apply optional overrides from `RunOptions` to this config.
    ///
    /// Only set fields in `options` override; `docs` are appended. `verbose`
    /// always takes the value from `options`.
    pub fn apply_options(&mut self, options: &RunOptions) {
        if let Some(agent) = options.agent {
            self.agent = agent;
        }
        if let Some(k) = options.top_k {
            self.top_k = k;
        }
        if let Some(max_steps) = options.max_steps {
            self.max_steps = max_steps;
        }
        if let Some(max_refinements) = options.max_refinements {
            self.max_refinements = max_refinements;
        }
        if let Some(t) = options.temperature {
            self.temperature = Some(t);
        }
        if let Some(size) = options.chunk_size {
            self.chunk_size = size;
        }
        if let Some(overlap) = options.chunk_overlap {
            self.chunk_overlap = overlap;
        }
        self.docs.extend(options.docs.iter().cloned());
        if options.stream {
            self.stream = true;
        }
        self.verbose = options.verbose;
    }

    /// The library-side agent configuration. Streaming runs generate through
    /// the streaming step so fragments can be printed.
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            k: self.top_k,
            max_steps: self.max_steps,
            max_refinements: self.max_refinements,
            stream_generation: self.stream,
            ..AgentConfig::default()
        }
    }

    /// Document chunking; fails unless `chunk_overlap < chunk_size`.
    pub fn chunking(&self) -> Result<Chunking, Error> {
        Chunking::new(self.chunk_size, self.chunk_overlap)
    }

    /// Multi-line summary printed to stderr by verbose runs. The API key is not included.
    pub fn summary(&self) -> String {
        let temperature = self
            .temperature
            .map(|t| t.to_string())
            .unwrap_or_else(|| "default".to_string());
        let docs = self
            .docs
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "llm: model={} api_base={} temperature={}\n\
             embedding: model={}\n\
             agent: {} k={} max_steps={} max_refinements={} stream={}\n\
             docs: [{}] chunk_size={} chunk_overlap={}",
            self.model,
            self.api_base,
            temperature,
            self.embedding_model,
            self.agent,
            self.top_k,
            self.max_steps,
            self.max_refinements,
            self.stream,
            docs,
            self.chunk_size,
            self.chunk_overlap
        )
    }
}

fn parsed_var<T>(name: &str) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| format!("invalid {}={:?}: {}", name, raw, e).into()),
        Err(_) => Ok(None),
    }
}
