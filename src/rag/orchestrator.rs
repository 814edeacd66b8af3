//! The RAG orchestrator.

use crate::config::{
    AdvisorConfig, DEFAULT_HISTORY_WINDOW, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TOP_K,
};
use crate::db::{HistoryStore, QdrantPassageIndex, VectorIndex};
use crate::llm::{LanguageModel, OpenAIChatModel};
use crate::memory::build_dialogue_context;
use crate::rag::embeddings::{EmbeddingProvider, HttpEmbeddingProvider};
use crate::rag::prompt::{self, APOLOGY_FALLBACK, NO_ANSWER_FALLBACK, SYSTEM_PROMPT_VERSION};
use crate::rag::retriever::Retriever;
use crate::types::{AdvisorError, AnswerResult, ConversationId, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Tuning knobs for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Passages requested from the index per query.
    pub top_k: usize,
    /// Most recent turns kept in the dialogue context; `None` disables the cap.
    pub history_window: Option<usize>,
    /// Deadline applied to the retrieval and generation calls.
    pub request_timeout: Duration,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            history_window: Some(DEFAULT_HISTORY_WINDOW),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl From<&AdvisorConfig> for OrchestratorOptions {
    fn from(config: &AdvisorConfig) -> Self {
        Self {
            top_k: config.rag.top_k,
            history_window: config.rag.history_window,
            request_timeout: config.request_timeout(),
        }
    }
}

/// Sequences the advisor pipeline and contains its failures.
///
/// Constructed once at startup from explicit client handles and shared by
/// the request-handling layer; all per-request state is rebuilt inside
/// [`answer`](Self::answer), so concurrent calls share nothing mutable.
///
/// The orchestrator performs no persistence: it reads history through the
/// [`HistoryStore`] and the caller persists both sides of the exchange
/// around the call.
pub struct RagOrchestrator {
    history: Arc<dyn HistoryStore>,
    retriever: Retriever,
    llm: Arc<dyn LanguageModel>,
    options: OrchestratorOptions,
}

impl RagOrchestrator {
    /// Build an orchestrator from explicit client handles.
    pub fn new(
        history: Arc<dyn HistoryStore>,
        embeddings: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        llm: Arc<dyn LanguageModel>,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            history,
            retriever: Retriever::new(embeddings, index),
            llm,
            options,
        }
    }

    /// Wire live clients (Qdrant, embedding endpoint, chat endpoint) from
    /// configuration. The history store stays injected: it belongs to the
    /// caller's persistence layer.
    pub fn from_config(config: &AdvisorConfig, history: Arc<dyn HistoryStore>) -> Result<Self> {
        let embeddings = Arc::new(HttpEmbeddingProvider::from_config(&config.embedding));
        let index = Arc::new(QdrantPassageIndex::from_config(&config.qdrant)?);
        let llm = Arc::new(OpenAIChatModel::from_config(&config.llm));

        Ok(Self::new(
            history,
            embeddings,
            index,
            llm,
            OrchestratorOptions::from(config),
        ))
    }

    /// Answer a user question within a conversation.
    ///
    /// Always returns a normal-looking chat answer: either the model's
    /// reply (`success = true`) or the fixed apology (`success = false`).
    /// No error ever propagates to the caller; the fallback mapping lives
    /// only here.
    pub async fn answer(&self, query: &str, conversation: &ConversationId) -> AnswerResult {
        match self.run(query, conversation).await {
            Ok(text) => AnswerResult {
                text,
                success: true,
            },
            Err(error) => {
                tracing::error!(%conversation, %error, "advisor pipeline failed");
                AnswerResult {
                    text: APOLOGY_FALLBACK.to_string(),
                    success: false,
                }
            }
        }
    }

    // Single-attempt pipeline; retry policy, if any, is the caller's.
    async fn run(&self, query: &str, conversation: &ConversationId) -> Result<String> {
        let history = self.history.load(conversation).await?;
        let mut context = build_dialogue_context(&history);

        if let Some(window) = self.options.history_window {
            if context.len() > window {
                context.drain(..context.len() - window);
            }
        }
        tracing::debug!(
            %conversation,
            loaded = history.len(),
            in_context = context.len(),
            "assembled dialogue context"
        );

        let passages = timeout(
            self.options.request_timeout,
            self.retriever.retrieve(query, self.options.top_k),
        )
        .await
        .map_err(|_| AdvisorError::Timeout("retrieval exceeded deadline".to_string()))??;

        let prompt = prompt::compose(&passages, &context, query);
        tracing::debug!(
            passages = passages.len(),
            template = SYSTEM_PROMPT_VERSION,
            "composed prompt"
        );

        let output = timeout(self.options.request_timeout, self.llm.generate(&prompt))
            .await
            .map_err(|_| AdvisorError::Timeout("generation exceeded deadline".to_string()))??;

        Ok(output
            .answer
            .unwrap_or_else(|| NO_ANSWER_FALLBACK.to_string()))
    }
}
