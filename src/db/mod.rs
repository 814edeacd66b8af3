//! External storage clients: vector index (Qdrant) and conversation history (libsql).

pub mod history;
pub mod qdrant;
pub mod vectorstore;

pub use history::{HistoryStore, LibsqlHistoryStore};
pub use qdrant::QdrantPassageIndex;
pub use vectorstore::VectorIndex;
