//! Qdrant-backed passage index.

use crate::config::QdrantConfig;
use crate::types::{AdvisorError, Result, RetrievedPassage};
use async_trait::async_trait;
use qdrant_client::{qdrant::SearchPointsBuilder, Qdrant};

use super::vectorstore::VectorIndex;

/// Similarity search against a Qdrant collection.
///
/// The collection is populated out-of-band by the document-ingestion
/// pipeline; this client only reads. Passage text is expected under the
/// `page_content` payload key (the layout the LangChain ingestion writes),
/// with `content` accepted as a fallback for collections written by other
/// tooling.
pub struct QdrantPassageIndex {
    client: Qdrant,
    collection: String,
}

impl QdrantPassageIndex {
    /// Connect to a Qdrant server.
    pub fn new(url: &str, api_key: Option<String>, collection: String) -> Result<Self> {
        let client = if let Some(key) = api_key {
            Qdrant::from_url(url)
                .api_key(key)
                .build()
                .map_err(|e| AdvisorError::Index(format!("Failed to create Qdrant client: {}", e)))?
        } else {
            Qdrant::from_url(url)
                .build()
                .map_err(|e| AdvisorError::Index(format!("Failed to create Qdrant client: {}", e)))?
        };

        Ok(Self { client, collection })
    }

    /// Connect using configuration values.
    pub fn from_config(config: &QdrantConfig) -> Result<Self> {
        Self::new(
            &config.url,
            config.api_key.clone(),
            config.collection_name.clone(),
        )
    }

    /// Map scored points to passages, preserving Qdrant's rank order.
    ///
    /// Points without readable text are skipped; everything else in the
    /// payload rides along as opaque metadata.
    fn parse_search_results(
        search_result: qdrant_client::qdrant::SearchResponse,
    ) -> Vec<RetrievedPassage> {
        search_result
            .result
            .into_iter()
            .filter_map(|scored_point| {
                let payload = scored_point.payload;
                let text = payload
                    .get("page_content")
                    .or_else(|| payload.get("content"))?
                    .as_str()?
                    .to_string();

                let mut metadata = serde_json::Map::new();
                for (key, value) in payload {
                    if key != "page_content" && key != "content" {
                        metadata.insert(key, value.into());
                    }
                }

                Some(RetrievedPassage {
                    text,
                    score: scored_point.score,
                    metadata: serde_json::Value::Object(metadata),
                })
            })
            .collect()
    }
}

#[async_trait]
impl VectorIndex for QdrantPassageIndex {
    async fn search(&self, embedding: &[f32], limit: usize) -> Result<Vec<RetrievedPassage>> {
        let search_builder =
            SearchPointsBuilder::new(&self.collection, embedding.to_vec(), limit as u64);

        let search_result = self
            .client
            .search_points(search_builder.with_payload(true))
            .await
            .map_err(|e| AdvisorError::Index(format!("Failed to search: {}", e)))?;

        Ok(Self::parse_search_results(search_result))
    }
}
