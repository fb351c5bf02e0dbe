use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::SiteWardenError;

/// Semantic similarity search over pre-chunked secure-coding documents.
///
/// Must be callable in any state: an unavailable or uninitialised index
/// returns an empty list instead of an error.
#[async_trait]
pub trait KnowledgeIndex: Send + Sync {
    async fn similarity_search(&self, query: &str, k: usize) -> Vec<String>;

    /// Index name for logging
    fn index_name(&self) -> &str;
}

/// Stand-in used before an index has been built or configured.
pub struct UninitializedIndex;

#[async_trait]
impl KnowledgeIndex for UninitializedIndex {
    async fn similarity_search(&self, _query: &str, _k: usize) -> Vec<String> {
        debug!("Knowledge index not initialized, returning no chunks");
        Vec::new()
    }

    fn index_name(&self) -> &str {
        "uninitialized"
    }
}

/// Client for a vector-store query endpoint.
///
/// Request: `POST {endpoint}` with `{"query": "...", "k": 3}`.
/// Accepted replies: `{"chunks": ["..."]}`, `{"results": [{"text": "..."}]}`
/// (also `page_content` / `content` keys), or a bare JSON array of either.
pub struct HttpKnowledgeIndex {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpKnowledgeIndex {
    pub fn new(endpoint: &str, api_key: Option<&str>, timeout: Duration) -> Result<Self, SiteWardenError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| SiteWardenError::Config(format!("Failed to build index client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()).map(|k| k.to_string()),
        })
    }

    async fn query(&self, query: &str, k: usize) -> Result<Vec<String>, SiteWardenError> {
        let mut request = self.client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "k": k }));
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let resp = request
            .send()
            .await
            .map_err(|e| SiteWardenError::KnowledgeIndex(format!("request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(SiteWardenError::KnowledgeIndex(format!("HTTP {}", resp.status().as_u16())));
        }

        let data: Value = resp.json().await
            .map_err(|e| SiteWardenError::KnowledgeIndex(format!("parse error: {}", e)))?;

        let mut chunks = parse_chunks(&data);
        chunks.truncate(k);
        Ok(chunks)
    }
}

#[async_trait]
impl KnowledgeIndex for HttpKnowledgeIndex {
    async fn similarity_search(&self, query: &str, k: usize) -> Vec<String> {
        match self.query(query, k).await {
            Ok(chunks) => {
                debug!(endpoint = %self.endpoint, chunks = chunks.len(), "Knowledge index query complete");
                chunks
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "Knowledge index unavailable");
                Vec::new()
            }
        }
    }

    fn index_name(&self) -> &str {
        &self.endpoint
    }
}

/// Pull chunk texts out of a query reply, skipping blank entries.
pub fn parse_chunks(data: &Value) -> Vec<String> {
    let items = if let Some(arr) = data.as_array() {
        arr
    } else if let Some(arr) = data.get("chunks").and_then(|v| v.as_array()) {
        arr
    } else if let Some(arr) = data.get("results").and_then(|v| v.as_array()) {
        arr
    } else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            item.as_str()
                .or_else(|| item.get("text").and_then(|v| v.as_str()))
                .or_else(|| item.get("page_content").and_then(|v| v.as_str()))
                .or_else(|| item.get("content").and_then(|v| v.as_str()))
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
