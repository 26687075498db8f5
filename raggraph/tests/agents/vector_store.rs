//! Agents over `InMemoryVectorStore` with a deterministic embedder.

use std::sync::Arc;

use raggraph::{
    AgentConfig, AgentKind, Document, InMemoryVectorStore, MockLlm, RagAgent, RagChain, Retriever,
};

use crate::common::KeywordEmbedder;

async fn store() -> Arc<InMemoryVectorStore> {
    let store = InMemoryVectorStore::new(Arc::new(KeywordEmbedder));
    store
        .add_documents(vec![
            Document::new("Python is a popular language."),
            Document::new("Rust is fast and memory safe."),
            Document::new("A python is also a snake."),
        ])
        .await
        .unwrap();
    Arc::new(store)
}

/// **Scenario**: The best match comes first and carries a score in [0, 1].
#[tokio::test]
async fn search_ranks_by_similarity() {
    let store = store().await;
    let docs = store.search("Is Rust fast?", 2).await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].content, "Rust is fast and memory safe.");
    let score = docs[0].score().unwrap();
    assert!((0.0..=1.0).contains(&score));
}

/// **Scenario**: A conditional agent answers from the store's top documents.
#[tokio::test]
async fn agent_answers_from_store() {
    let llm = MockLlm::new("Python is a language and a snake.");
    let config = AgentConfig {
        k: 2,
        ..AgentConfig::default()
    };
    let agent = RagAgent::new(AgentKind::Conditional, Arc::new(llm.clone()), store().await, &config)
        .unwrap();

    let out = agent.invoke("Tell me about python").await.unwrap();
    assert_eq!(out.docs().len(), 2);
    assert!(out.docs().iter().all(|d| d.content.to_lowercase().contains("python")));
    assert_eq!(out.answer.as_deref(), Some("Python is a language and a snake."));
    assert!(llm.prompts()[0].contains("[Document 1]"));
}

/// **Scenario**: The chain reads from the same store.
#[tokio::test]
async fn chain_queries_store() {
    let llm = MockLlm::new("ok");
    let chain = RagChain::new(Arc::new(llm.clone()), store().await);
    assert_eq!(chain.query("memory safety in rust", 1).await.unwrap(), "ok");
    assert!(llm.prompts()[0].contains("Rust is fast and memory safe."));
}
