//! Core types shared across the advisor pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============= Conversation Types =============

/// Opaque identifier scoping a dialogue.
///
/// Owned by the persistence layer; the pipeline treats it as an immutable
/// key and never interprets its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A persisted chat message as loaded from storage.
///
/// `role` carries the label exactly as persisted (`"user"`, `"bot"`, ...);
/// mapping to model-facing roles happens in the memory assembler. Messages
/// within a conversation are totally ordered by `timestamp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Persisted role label, not yet normalized.
    pub role: String,
    /// Message text.
    pub content: String,
    /// Insertion time, the sequence position within the conversation.
    pub timestamp: DateTime<Utc>,
}

/// Model-facing role of a dialogue turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// A turn authored by the end user.
    User,
    /// A turn authored by the advisor.
    Assistant,
}

/// A single normalized turn inside a [`DialogueContext`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueTurn {
    /// Normalized role tag.
    pub role: TurnRole,
    /// Turn text.
    pub content: String,
}

/// Ordered dialogue history passed to the generation step.
///
/// Rebuilt fresh from persisted messages on every query and discarded after
/// use; never cached or mutated across calls.
pub type DialogueContext = Vec<DialogueTurn>;

// ============= Retrieval Types =============

/// A passage returned by the vector index for a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Passage text.
    pub text: String,
    /// Similarity score assigned by the index (higher is better).
    pub score: f32,
    /// Source metadata, opaque to the pipeline.
    pub metadata: serde_json::Value,
}

// ============= Prompt Types =============

/// Fully assembled input for one generation call.
///
/// Built fresh per request and immutable once constructed.
#[derive(Debug, Clone)]
pub struct PromptPayload {
    /// System instruction with the retrieved context substituted in.
    pub system_instruction: String,
    /// Rank-ordered concatenation of retrieved passage texts.
    pub retrieved_context: String,
    /// Prior turns, passed to the model as structured messages.
    pub dialogue_history: DialogueContext,
    /// The new user question.
    pub new_query: String,
}

// ============= Answer Types =============

/// The orchestrator's reply to the caller.
///
/// `success` is `false` only when the pipeline failed and `text` holds the
/// fixed apology; the caller decides how to report that at its own layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Answer text shown to the user.
    pub text: String,
    /// Whether the pipeline ran to completion.
    pub success: bool,
}

// ============= Error Types =============

/// Error taxonomy for the advisor pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// Conversation history could not be loaded.
    #[error("History error: {0}")]
    History(String),

    /// The embedding provider failed.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// The vector index was unreachable or returned an error.
    #[error("Index error: {0}")]
    Index(String),

    /// The language model call failed or returned a malformed response.
    #[error("Generation error: {0}")]
    Generation(String),

    /// An external call exceeded the configured deadline.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AdvisorError>;
