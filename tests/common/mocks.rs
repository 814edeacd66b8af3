//! Mock implementations for testing.
//!
//! These stand in for the external collaborators (history store, embedding
//! provider, vector index, language model) so pipeline tests run without
//! any network dependencies.

use async_trait::async_trait;
use fina::llm::{GenerationOutput, LanguageModel};
use fina::rag::EmbeddingProvider;
use fina::types::{
    AdvisorError, ConversationId, Message, PromptPayload, Result, RetrievedPassage,
};
use fina::{HistoryStore, VectorIndex};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Build a persisted message with a deterministic timestamp.
pub fn message(role: &str, content: &str, secs: i64) -> Message {
    Message {
        role: role.to_string(),
        content: content.to_string(),
        timestamp: chrono::DateTime::from_timestamp(secs, 0).unwrap(),
    }
}

/// Build a passage with opaque metadata.
pub fn passage(text: &str, score: f32) -> RetrievedPassage {
    RetrievedPassage {
        text: text.to_string(),
        score,
        metadata: serde_json::json!({ "source": "mock" }),
    }
}

/// History store preloaded with messages, or configured to fail.
pub struct MockHistoryStore {
    messages: Vec<Message>,
    should_fail: bool,
}

impl MockHistoryStore {
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            should_fail: false,
        }
    }

    pub fn empty() -> Self {
        Self::with_messages(vec![])
    }

    pub fn failing() -> Self {
        Self {
            messages: vec![],
            should_fail: true,
        }
    }
}

#[async_trait]
impl HistoryStore for MockHistoryStore {
    async fn load(&self, _conversation: &ConversationId) -> Result<Vec<Message>> {
        if self.should_fail {
            return Err(AdvisorError::History("Mock storage unreachable".to_string()));
        }
        Ok(self.messages.clone())
    }
}

/// Embedding provider returning a fixed vector, or configured to fail.
pub struct MockEmbeddingProvider {
    vector: Vec<f32>,
    should_fail: bool,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self {
            vector: vec![0.1, 0.2, 0.3],
            should_fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            vector: vec![],
            should_fail: true,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        if self.should_fail {
            return Err(AdvisorError::Embedding("Mock embedding failure".to_string()));
        }
        Ok(self.vector.clone())
    }
}

/// Vector index serving preset passages, or configured to fail.
pub struct MockVectorIndex {
    passages: Vec<RetrievedPassage>,
    should_fail: bool,
}

impl MockVectorIndex {
    pub fn with_passages(passages: Vec<RetrievedPassage>) -> Self {
        Self {
            passages,
            should_fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            passages: vec![],
            should_fail: true,
        }
    }
}

#[async_trait]
impl VectorIndex for MockVectorIndex {
    async fn search(&self, _embedding: &[f32], limit: usize) -> Result<Vec<RetrievedPassage>> {
        if self.should_fail {
            return Err(AdvisorError::Index("Mock connection refused".to_string()));
        }
        Ok(self.passages.iter().take(limit).cloned().collect())
    }
}

/// Language model with configurable behaviors for pipeline tests.
pub struct MockLanguageModel {
    behavior: Behavior,
    /// Last payload received by `generate`, when recording.
    pub received: Arc<Mutex<Option<PromptPayload>>>,
}

enum Behavior {
    /// Answer with markers derived from the payload.
    Echo,
    /// Record the payload and answer with a fixed string.
    Recording(String),
    /// Complete without an answer field.
    MissingAnswer,
    /// Fail outright.
    Failing,
    /// Sleep before answering.
    Slow(Duration),
}

impl MockLanguageModel {
    pub fn echoing() -> Self {
        Self {
            behavior: Behavior::Echo,
            received: Arc::new(Mutex::new(None)),
        }
    }

    pub fn recording(answer: &str) -> Self {
        Self {
            behavior: Behavior::Recording(answer.to_string()),
            received: Arc::new(Mutex::new(None)),
        }
    }

    pub fn missing_answer() -> Self {
        Self {
            behavior: Behavior::MissingAnswer,
            received: Arc::new(Mutex::new(None)),
        }
    }

    pub fn failing() -> Self {
        Self {
            behavior: Behavior::Failing,
            received: Arc::new(Mutex::new(None)),
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            behavior: Behavior::Slow(delay),
            received: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn generate(&self, prompt: &PromptPayload) -> Result<GenerationOutput> {
        *self.received.lock().unwrap() = Some(prompt.clone());

        match &self.behavior {
            Behavior::Echo => Ok(GenerationOutput {
                answer: Some(format!(
                    "ctx[{}] turns[{}] q[{}]",
                    prompt.retrieved_context,
                    prompt.dialogue_history.len(),
                    prompt.new_query
                )),
            }),
            Behavior::Recording(answer) => Ok(GenerationOutput {
                answer: Some(answer.clone()),
            }),
            Behavior::MissingAnswer => Ok(GenerationOutput { answer: None }),
            Behavior::Failing => Err(AdvisorError::Generation("Mock LLM failure".to_string())),
            Behavior::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(GenerationOutput {
                    answer: Some("late answer".to_string()),
                })
            }
        }
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
