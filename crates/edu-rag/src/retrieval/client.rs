//! Embedding-backed search over the vector index

use std::sync::Arc;

use crate::config::{AiConfig, DistanceMetric};
use crate::error::{Error, Result};
use crate::orchestrator::LlmOrchestrator;
use crate::types::{DocumentChunk, RetrievedDoc};

use super::vector_store::VectorStore;

/// Default number of neighbors fetched per query
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Source marker on the synthetic document returned in mock/disabled mode
pub const MOCK_SOURCE: &str = "mock";

/// Turns questions into embeddings and queries the vector index. Degrades to
/// a deterministic synthetic result when retrieval is mocked or the index is
/// not configured.
pub struct RetrievalClient {
    orchestrator: Arc<LlmOrchestrator>,
    store: Arc<VectorStore>,
    vector_size: usize,
    distance: DistanceMetric,
    mock_mode: bool,
}

impl RetrievalClient {
    /// Create a client sharing the process-wide orchestrator and adapter
    pub fn new(config: &AiConfig, orchestrator: Arc<LlmOrchestrator>, store: Arc<VectorStore>) -> Self {
        Self {
            orchestrator,
            store,
            vector_size: config.vector_db.vector_size,
            distance: config.vector_db.distance,
            mock_mode: config.mock_mode,
        }
    }

    /// Search for material related to `query`.
    ///
    /// In mock or disabled mode this returns exactly one synthetic document
    /// that embeds the query text, so callers and tests can assert on it,
    /// without touching the network. Otherwise the query is embedded via the
    /// orchestrator and the index results come back unmodified in index
    /// order; this client never re-sorts.
    ///
    /// An outright embedding or index failure surfaces as
    /// `Error::RetrievalUnavailable`, which is distinct from a legitimate
    /// empty result list.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<RetrievedDoc>> {
        if self.mock_mode || !self.store.is_enabled() {
            return Ok(vec![RetrievedDoc {
                text: format!("Mock context for: {}", query),
                source: MOCK_SOURCE.to_string(),
                score: 1.0,
            }]);
        }

        let vectors = self
            .orchestrator
            .embed(&[query.to_string()], None)
            .await
            .map_err(|e| Error::retrieval(format!("query embedding failed: {}", e)))?;
        let vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| Error::retrieval("embedding returned no vector"))?;

        let hits = self.store.query(&vector, limit).await?;

        Ok(hits
            .into_iter()
            .map(|hit| RetrievedDoc {
                text: hit
                    .payload
                    .get("text")
                    .and_then(|value| value.as_str())
                    .unwrap_or_default()
                    .to_string(),
                source: hit
                    .payload
                    .get("source")
                    .and_then(|value| value.as_str())
                    .unwrap_or("unknown")
                    .to_string(),
                score: hit.score,
            })
            .collect())
    }

    /// Index a batch of chunks: ensure the collection exists with the
    /// configured dimensionality, embed every chunk text in one batched
    /// call, and upsert with payload = chunk metadata merged with
    /// `{text, id}`. No-op when the index is not configured.
    pub async fn upsert_documents(&self, chunks: &[DocumentChunk]) -> Result<()> {
        if !self.store.is_enabled() {
            return Ok(());
        }
        if chunks.is_empty() {
            return Ok(());
        }

        self.store
            .ensure_collection(self.vector_size, self.distance)
            .await?;

        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let embeddings = self.orchestrator.embed(&texts, None).await?;

        let payloads = chunks
            .iter()
            .map(|chunk| {
                let mut payload = chunk.metadata.clone();
                payload.insert("text".to_string(), chunk.text.clone().into());
                payload.insert("id".to_string(), chunk.id.clone().into());
                payload
            })
            .collect();

        self.store.upsert(&embeddings, payloads).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error as CoreError;
    use crate::providers::LlmProvider;
    use crate::types::{GenerationRequest, GenerationResult};
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Any call proves a network-bound path was taken
    struct PanickyProvider;

    #[async_trait]
    impl LlmProvider for PanickyProvider {
        async fn generate(&self, _request: &GenerationRequest) -> Result<GenerationResult> {
            Err(CoreError::unavailable("panicky", "generate called"))
        }

        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(CoreError::unavailable("panicky", "embed called"))
        }

        fn name(&self) -> &str {
            "panicky"
        }
    }

    fn disabled_client(mock_mode: bool) -> RetrievalClient {
        let mut providers: HashMap<String, Arc<dyn LlmProvider>> = HashMap::new();
        providers.insert("panicky".to_string(), Arc::new(PanickyProvider));
        let orchestrator = Arc::new(LlmOrchestrator::with_providers(providers, "panicky"));

        let mut config = AiConfig::default();
        config.mock_mode = mock_mode;
        let store = Arc::new(VectorStore::new(&config.vector_db));
        RetrievalClient::new(&config, orchestrator, store)
    }

    #[tokio::test]
    async fn test_search_disabled_returns_one_synthetic_doc() {
        let client = disabled_client(false);

        let docs = client.search("什么是二次方程", 5).await.unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source, MOCK_SOURCE);
        assert!(docs[0].text.contains("什么是二次方程"));
    }

    #[tokio::test]
    async fn test_search_mock_mode_never_embeds() {
        // The embedding provider errors on any call; a successful search
        // proves the mock path short-circuits before the network.
        let client = disabled_client(true);

        let docs = client.search("anything", 5).await.unwrap();

        assert_eq!(docs.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_disabled_is_noop() {
        let client = disabled_client(false);
        let chunks = vec![DocumentChunk::new("doc-0", "chunk text", "doc.txt")];

        // Would fail through the panicky embedder if the disabled guard
        // did not short-circuit first
        client.upsert_documents(&chunks).await.unwrap();
    }
}
