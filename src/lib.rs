//! # F.I.N.A - Financial Intelligence Advisor
//!
//! The RAG-grounded conversational advisor core of a personal-finance
//! application: given a user question and a conversation id, it retrieves
//! relevant financial-document passages from a vector index, rebuilds the
//! dialogue history into structured turns, composes a grounded prompt, and
//! returns a continuity-aware answer.
//!
//! This is a library-style component: the web layer (routing, auth,
//! persistence of the exchange) lives elsewhere and calls
//! [`RagOrchestrator::answer`] in-process.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fina::{AdvisorConfig, ConversationId, LibsqlHistoryStore, RagOrchestrator};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AdvisorConfig::from_env()?;
//!     let history = Arc::new(LibsqlHistoryStore::new_local("data/chat.db").await?);
//!     let advisor = RagOrchestrator::from_config(&config, history.clone())?;
//!
//!     let conversation = ConversationId::from("conv-1");
//!     let answer = advisor
//!         .answer("Tôi nên đầu tư vào đâu với 10 triệu/tháng?", &conversation)
//!         .await;
//!     println!("{}", answer.text);
//!
//!     // The caller persists both sides of the exchange.
//!     history.append(&conversation, "user", "Tôi nên đầu tư vào đâu với 10 triệu/tháng?").await?;
//!     history.append(&conversation, "bot", &answer.text).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Failure containment
//!
//! Any failure inside the pipeline (history load, embedding, index search,
//! generation, timeout) is caught at the orchestrator boundary and
//! degrades to a fixed apology answer with `success = false`. A chat query
//! never surfaces a stack trace or an error code to the user.
//!
//! ## Modules
//!
//! - [`rag`] - retrieval, prompt composition, and the orchestrator
//! - [`memory`] - dialogue-context reconstruction from persisted messages
//! - [`llm`] - language model clients and abstractions
//! - [`db`] - Qdrant passage index and libsql history store
//! - [`types`] - shared types and error handling
//! - [`config`] - environment-driven configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Environment-driven configuration.
pub mod config;
/// Storage clients (Qdrant, libsql).
pub mod db;
/// LLM provider clients and abstractions.
pub mod llm;
/// Conversation memory reconstruction.
pub mod memory;
/// Retrieval Augmented Generation pipeline.
pub mod rag;
/// Core types and error handling.
pub mod types;

// Re-export commonly used types
pub use config::AdvisorConfig;
pub use db::{HistoryStore, LibsqlHistoryStore, QdrantPassageIndex, VectorIndex};
pub use llm::{GenerationOutput, LanguageModel, OpenAIChatModel};
pub use rag::{EmbeddingProvider, HttpEmbeddingProvider, OrchestratorOptions, RagOrchestrator};
pub use types::{
    AdvisorError, AnswerResult, ConversationId, DialogueContext, DialogueTurn, Message,
    PromptPayload, Result, RetrievedPassage, TurnRole,
};
