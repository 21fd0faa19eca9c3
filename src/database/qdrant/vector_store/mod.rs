
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use url::Url;

use super::{IndexedDocument, ScoredDocument};
use crate::config::Config;
use crate::http::{DEFAULT_TIMEOUT_SECONDS, JsonAgent, endpoint};

/// Handle on one Qdrant collection, spoken to over the REST API
#[derive(Debug, Clone)]
pub struct VectorStore {
    base_url: Url,
    collection: String,
    vector_size: u32,
    agent: JsonAgent,
}

/// Envelope every Qdrant REST response is wrapped in
#[derive(Debug, Deserialize)]
struct QdrantResponse<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct CountResult {
    count: u64,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    points: &'a [IndexedDocument],
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

impl VectorStore {
    #[inline]
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config
            .qdrant_url()
            .context("Failed to build Qdrant URL from config")?;

        Ok(Self {
            base_url,
            collection: config.qdrant.collection.clone(),
            vector_size: config.qdrant.vector_size,
            agent: JsonAgent::new(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)),
        })
    }

    #[inline]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn collection_url(&self, suffix: &str) -> Result<Url> {
        endpoint(
            &self.base_url,
            &format!("collections/{}/{}", self.collection, suffix),
        )
    }

    #[inline]
    pub fn collection_exists(&self) -> Result<bool> {
        let url = self.collection_url("")?;
        let reply = self
            .agent
            .get(&url)
            .context("Failed to query collection")?;

        match reply.status {
            404 => Ok(false),
            _ if reply.is_success() => Ok(true),
            status => Err(anyhow!(
                "Failed to query collection '{}': HTTP {}: {}",
                self.collection,
                status,
                reply.body.trim()
            )),
        }
    }

    /// Create the collection with cosine distance if it is absent; returns whether it was created
    #[inline]
    pub fn ensure_collection(&self) -> Result<bool> {
        if self.collection_exists()? {
            debug!("Collection '{}' already exists", self.collection);
            return Ok(false);
        }

        let url = self.collection_url("")?;
        let body = json!({
            "vectors": {
                "size": self.vector_size,
                "distance": "Cosine",
            }
        });

        self.agent
            .put_json(&url, &body)?
            .json::<serde_json::Value>()
            .with_context(|| format!("Failed to create collection '{}'", self.collection))?;

        info!(
            "Created collection '{}' ({} dimensions, cosine distance)",
            self.collection, self.vector_size
        );
        Ok(true)
    }

    /// Insert or replace documents by id
    #[inline]
    pub fn upsert(&self, documents: &[IndexedDocument]) -> Result<()> {
        if documents.is_empty() {
            debug!("Nothing to upsert into '{}'", self.collection);
            return Ok(());
        }

        let mut url = self.collection_url("points")?;
        url.query_pairs_mut().append_pair("wait", "true");

        self.agent
            .put_json(&url, &UpsertRequest { points: documents })?
            .json::<serde_json::Value>()
            .with_context(|| {
                format!(
                    "Failed to upsert {} points into '{}'",
                    documents.len(),
                    self.collection
                )
            })?;

        debug!(
            "Upserted {} points into '{}'",
            documents.len(),
            self.collection
        );
        Ok(())
    }

    /// The `limit` nearest documents to `vector`, most similar first
    #[inline]
    pub fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredDocument>> {
        let url = self.collection_url("points/search")?;
        let request = SearchRequest {
            vector,
            limit,
            with_payload: true,
        };

        let response: QdrantResponse<Vec<ScoredDocument>> = self
            .agent
            .post_json(&url, &request)?
            .json()
            .with_context(|| format!("Failed to search collection '{}'", self.collection))?;

        debug!(
            "Search in '{}' returned {} hits",
            self.collection,
            response.result.len()
        );
        Ok(response.result)
    }

    #[inline]
    pub fn count_documents(&self) -> Result<u64> {
        let url = self.collection_url("points/count")?;

        let response: QdrantResponse<CountResult> = self
            .agent
            .post_json(&url, &json!({ "exact": true }))?
            .json()
            .with_context(|| format!("Failed to count points in '{}'", self.collection))?;

        Ok(response.result.count)
    }
}
