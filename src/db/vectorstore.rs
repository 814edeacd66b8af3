//! Vector index abstraction.

use crate::types::{Result, RetrievedPassage};
use async_trait::async_trait;

/// Read-only similarity search over a pre-populated passage index.
///
/// Index population happens out-of-band; the pipeline never writes. For an
/// unchanged index and identical query vector, implementations must return
/// passages in a deterministic order, ranked by descending similarity with
/// stable ties.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `limit` passages nearest to `embedding`.
    async fn search(&self, embedding: &[f32], limit: usize) -> Result<Vec<RetrievedPassage>>;
}
