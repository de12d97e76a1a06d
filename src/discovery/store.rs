//! Vector store access
//!
//! The engine and resolver depend only on the `VectorStore` trait so tests
//! can inject fakes. `ChromaStore` is the production implementation over a
//! Chroma-style HTTP API: the collection is resolved by name once at connect
//! time, queries are batched (this subsystem always submits a batch of one),
//! and distances or metadata entries may legitimately come back null.

use serde::Deserialize;
use serde_json::{json, Value};

use super::community::CommunityMeta;
use crate::config::Config;
use crate::error::DiscoveryError;

/// Batched nearest-neighbor query response (one inner vec per query)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub ids: Vec<Vec<String>>,
    #[serde(default)]
    pub metadatas: Vec<Vec<Option<CommunityMeta>>>,
    #[serde(default)]
    pub distances: Vec<Vec<Option<f64>>>,
}

/// Direct lookup response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetResult {
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub metadatas: Vec<Option<CommunityMeta>>,
    #[serde(default)]
    pub embeddings: Vec<Option<Vec<f32>>>,
}

/// Read-only access to the community directory
pub trait VectorStore {
    fn query_by_text(
        &self,
        text: &str,
        limit: usize,
        where_clause: Option<Value>,
    ) -> impl std::future::Future<Output = Result<QueryResult, DiscoveryError>> + Send;

    fn query_by_embedding(
        &self,
        embedding: &[f32],
        limit: usize,
        where_clause: Option<Value>,
    ) -> impl std::future::Future<Output = Result<QueryResult, DiscoveryError>> + Send;

    fn get_by_id(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<GetResult, DiscoveryError>> + Send;

    fn get_by_metadata(
        &self,
        clause: Value,
    ) -> impl std::future::Future<Output = Result<GetResult, DiscoveryError>> + Send;
}

/// Chroma-backed community directory
pub struct ChromaStore {
    http: reqwest::Client,
    base_url: String,
    collection_id: String,
}

#[derive(Debug, Deserialize)]
struct CollectionInfo {
    id: String,
}

impl ChromaStore {
    /// Connect and resolve the collection name to its id.
    pub async fn connect(config: &Config) -> Result<Self, DiscoveryError> {
        let http = reqwest::Client::new();
        let url = format!(
            "{}/api/v1/collections/{}",
            config.vector_store_url, config.vector_collection
        );

        let response = http.get(&url).send().await?;
        let response = check_status(response).await?;
        let info: CollectionInfo = response.json().await?;

        Ok(Self {
            http,
            base_url: config.vector_store_url.clone(),
            collection_id: info.id,
        })
    }

    fn collection_url(&self, op: &str) -> String {
        format!(
            "{}/api/v1/collections/{}/{}",
            self.base_url, self.collection_id, op
        )
    }

    async fn query(&self, body: Value) -> Result<QueryResult, DiscoveryError> {
        let response = self
            .http
            .post(self.collection_url("query"))
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn get(&self, body: Value) -> Result<GetResult, DiscoveryError> {
        let response = self
            .http
            .post(self.collection_url("get"))
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

impl VectorStore for ChromaStore {
    async fn query_by_text(
        &self,
        text: &str,
        limit: usize,
        where_clause: Option<Value>,
    ) -> Result<QueryResult, DiscoveryError> {
        let mut body = json!({
            "query_texts": [text],
            "n_results": limit,
            "include": ["metadatas", "distances"],
        });
        if let Some(clause) = where_clause {
            body["where"] = clause;
        }
        self.query(body).await
    }

    async fn query_by_embedding(
        &self,
        embedding: &[f32],
        limit: usize,
        where_clause: Option<Value>,
    ) -> Result<QueryResult, DiscoveryError> {
        let mut body = json!({
            "query_embeddings": [embedding],
            "n_results": limit,
            "include": ["metadatas", "distances"],
        });
        if let Some(clause) = where_clause {
            body["where"] = clause;
        }
        self.query(body).await
    }

    async fn get_by_id(&self, id: &str) -> Result<GetResult, DiscoveryError> {
        self.get(json!({
            "ids": [id],
            "include": ["metadatas", "embeddings"],
        }))
        .await
    }

    async fn get_by_metadata(&self, clause: Value) -> Result<GetResult, DiscoveryError> {
        self.get(json!({
            "where": clause,
            "include": ["metadatas", "embeddings"],
        }))
        .await
    }
}

/// Map a non-2xx response to Transport with the upstream status and body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DiscoveryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DiscoveryError::Transport(format!(
        "vector store returned {}: {}",
        status,
        body.trim()
    )))
}
