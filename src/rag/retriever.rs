//! Query-time retrieval.

use crate::db::VectorIndex;
use crate::rag::embeddings::EmbeddingProvider;
use crate::types::{Result, RetrievedPassage};
use std::sync::Arc;

/// Embeds a query and fetches the nearest passages from the index.
pub struct Retriever {
    embeddings: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl Retriever {
    /// Create a retriever over the given provider and index.
    pub fn new(embeddings: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embeddings, index }
    }

    /// Return up to `k` passages for `query`, in index rank order.
    ///
    /// The index may return fewer than `k` when it holds fewer matches; it
    /// is never allowed to return more.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedPassage>> {
        let vector = self.embeddings.embed(query).await?;
        let mut passages = self.index.search(&vector, k).await?;
        passages.truncate(k);

        tracing::debug!(requested = k, returned = passages.len(), "retrieved passages");
        Ok(passages)
    }
}
