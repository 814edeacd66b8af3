//! Conversation memory reconstruction.
//!
//! Durable message history is owned by the persistence layer; this module
//! only rebuilds a model-facing [`DialogueContext`](crate::types::DialogueContext)
//! from it, fresh on every query. No caching: a cached context would go
//! stale under concurrent writers to the same conversation.

pub mod assembler;

pub use assembler::build_dialogue_context;
