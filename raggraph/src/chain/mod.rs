//! Graph-free RAG chains: retrieve, render, generate in one call.

mod conversational;
mod rag_chain;

pub use conversational::{ConversationalRagChain, DEFAULT_MAX_HISTORY, FIRST_TURN_HISTORY};
pub use rag_chain::{RagChain, EMPTY_RETRIEVAL_ANSWER};
