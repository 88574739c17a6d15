//! Thin adapter over the external similarity index
//!
//! Speaks the index's REST interface directly, addressed by one collection
//! name per deployment. Constructed without a URL, the adapter runs in
//! disabled mode: every operation is a silent no-op or empty result. That
//! mode is a designed configuration state, not an error.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{DistanceMetric, VectorDbConfig};
use crate::error::{Error, Result};
use crate::types::Metadata;

/// A stored payload annotated with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredPayload {
    /// Payload stored alongside the vector at upsert time
    pub payload: Metadata,
    /// Similarity score, higher is more relevant
    pub score: f32,
}

struct Backend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Similarity index adapter with a designed disabled mode
pub struct VectorStore {
    backend: Option<Backend>,
    collection: String,
}

#[derive(Serialize)]
struct CreateCollectionRequest {
    vectors: VectorParams,
}

#[derive(Serialize)]
struct VectorParams {
    size: usize,
    distance: &'static str,
}

#[derive(Serialize)]
struct UpsertRequest {
    points: Vec<Point>,
}

#[derive(Serialize)]
struct Point {
    id: String,
    vector: Vec<f32>,
    payload: Metadata,
}

#[derive(Serialize)]
struct SearchRequest {
    vector: Vec<f32>,
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    score: f32,
    #[serde(default)]
    payload: Metadata,
}

impl VectorStore {
    /// Create an adapter from configuration. Without a configured URL the
    /// adapter is disabled.
    pub fn new(config: &VectorDbConfig) -> Self {
        let backend = config.url.as_ref().map(|url| {
            let client = Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .pool_max_idle_per_host(5)
                .build()
                .expect("Failed to create HTTP client");

            Backend {
                client,
                base_url: url.trim_end_matches('/').to_string(),
                api_key: config.api_key.clone(),
            }
        });

        if backend.is_none() {
            tracing::info!(
                collection = %config.collection,
                "vector index not configured, retrieval runs in disabled mode"
            );
        }

        Self {
            backend,
            collection: config.collection.clone(),
        }
    }

    /// Whether a backing index is reachable by configuration
    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Collection this adapter is addressed to
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn request(&self, backend: &Backend, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &backend.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }

    /// Idempotent create-if-absent. No-op when the collection already exists
    /// or when the adapter is disabled.
    pub async fn ensure_collection(
        &self,
        vector_size: usize,
        distance: DistanceMetric,
    ) -> Result<()> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };

        let collection_url = format!("{}/collections/{}", backend.base_url, self.collection);
        let response = self
            .request(backend, backend.client.get(&collection_url))
            .send()
            .await
            .map_err(|e| Error::retrieval(format!("collection lookup failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                tracing::info!(collection = %self.collection, "creating collection");
                let payload = CreateCollectionRequest {
                    vectors: VectorParams {
                        size: vector_size,
                        distance: distance.as_str(),
                    },
                };
                let response = self
                    .request(backend, backend.client.put(&collection_url))
                    .json(&payload)
                    .send()
                    .await
                    .map_err(|e| Error::retrieval(format!("collection create failed: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::retrieval(format!(
                        "collection create failed ({}): {}",
                        status, body
                    )));
                }
                Ok(())
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::retrieval(format!(
                    "collection lookup failed ({}): {}",
                    status, body
                )))
            }
        }
    }

    /// Store one embedding per payload, same order. The payload travels with
    /// the vector and comes back verbatim from `query`.
    pub async fn upsert(&self, embeddings: &[Vec<f32>], payloads: Vec<Metadata>) -> Result<()> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };

        if embeddings.len() != payloads.len() {
            return Err(Error::retrieval(format!(
                "{} embeddings for {} payloads",
                embeddings.len(),
                payloads.len()
            )));
        }

        let points: Vec<Point> = embeddings
            .iter()
            .zip(payloads)
            .enumerate()
            .map(|(index, (vector, payload))| Point {
                id: point_id(&payload, index),
                vector: vector.clone(),
                payload,
            })
            .collect();

        let url = format!(
            "{}/collections/{}/points?wait=true",
            backend.base_url, self.collection
        );
        let response = self
            .request(backend, backend.client.put(&url))
            .json(&UpsertRequest { points })
            .send()
            .await
            .map_err(|e| Error::retrieval(format!("upsert failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::retrieval(format!(
                "upsert failed ({}): {}",
                status, body
            )));
        }

        Ok(())
    }

    /// Nearest-neighbor query: up to `limit` payloads, highest similarity
    /// first, in the order the index returned them. Empty in disabled mode.
    pub async fn query(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredPayload>> {
        let Some(backend) = &self.backend else {
            return Ok(Vec::new());
        };

        let url = format!(
            "{}/collections/{}/points/search",
            backend.base_url, self.collection
        );
        let payload = SearchRequest {
            vector: vector.to_vec(),
            limit,
            with_payload: true,
        };

        let response = self
            .request(backend, backend.client.post(&url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::retrieval(format!("search failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::retrieval(format!(
                "search failed ({}): {}",
                status, body
            )));
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::retrieval(format!("malformed search response: {}", e)))?;

        Ok(search_response
            .result
            .into_iter()
            .map(|hit| ScoredPayload {
                payload: hit.payload,
                score: hit.score,
            })
            .collect())
    }
}

/// Point id from the payload's `id` field, falling back to the positional
/// index as a string
fn point_id(payload: &Metadata, index: usize) -> String {
    payload
        .get("id")
        .and_then(|value| value.as_str())
        .map(|id| id.to_string())
        .unwrap_or_else(|| index.to_string())
}
