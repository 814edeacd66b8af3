//! Retrieval Augmented Generation pipeline.
//!
//! The query path is a strictly sequential chain per request:
//!
//! 1. **History** - persisted messages are loaded and rebuilt into a
//!    dialogue context ([`crate::memory`])
//! 2. **Retrieval** - the query is embedded and the nearest passages are
//!    fetched from the vector index ([`retriever`])
//! 3. **Composition** - system instruction, retrieved context, history and
//!    the new question become one prompt payload ([`prompt`])
//! 4. **Generation** - the language model produces the answer
//!
//! [`orchestrator::RagOrchestrator`] sequences these steps and contains
//! every failure behind a fixed apology answer.

pub mod embeddings;
pub mod orchestrator;
pub mod prompt;
pub mod retriever;

pub use embeddings::{EmbeddingProvider, HttpEmbeddingProvider};
pub use orchestrator::{OrchestratorOptions, RagOrchestrator};
pub use retriever::Retriever;
