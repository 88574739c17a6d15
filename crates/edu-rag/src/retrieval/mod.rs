//! Retrieval: vector index adapter and the embedding-backed search client

pub mod client;
pub mod vector_store;

pub use client::RetrievalClient;
pub use vector_store::{ScoredPayload, VectorStore};
