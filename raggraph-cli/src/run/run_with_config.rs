//! Run with a given config; does not read .env.
//!
//! Loads the documents, embeds them into an [`InMemoryVectorStore`] with
//! [`OpenAIEmbedder`], then hands a [`ChatOpenAI`] and the store to
//! [`run_agent`](super::run_agent).

use std::sync::Arc;

use async_openai::config::OpenAIConfig;
use raggraph::{AgentState, ChatOpenAI, InMemoryVectorStore, OpenAIEmbedder};
use tracing::info;

use crate::config::RunConfig;
use crate::documents::load_documents;

use super::{run_agent, Error};

/// Answer `question` over `config.docs`; returns the final state.
pub async fn run_with_config(config: &RunConfig, question: &str) -> Result<AgentState, Error> {
    if config.verbose {
        eprintln!("{}", config.summary());
    }

    let openai_config = OpenAIConfig::new()
        .with_api_base(&config.api_base)
        .with_api_key(config.api_key.clone());

    let documents = load_documents(&config.docs, config.chunking()?)?;
    let embedder = OpenAIEmbedder::with_config(openai_config.clone(), &config.embedding_model);
    let store = InMemoryVectorStore::new(Arc::new(embedder));
    let indexed = store.add_documents(documents).await?;
    info!(documents = indexed, "indexed");

    let mut llm = ChatOpenAI::with_config(openai_config, &config.model);
    if let Some(t) = config.temperature {
        llm = llm.with_temperature(t);
    }

    run_agent(config, Arc::new(llm), Arc::new(store), question).await
}
