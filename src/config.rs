//! Environment-driven configuration.

use crate::types::{AdvisorError, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Top-level configuration for the advisor pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorConfig {
    /// Vector index connection settings.
    pub qdrant: QdrantConfig,
    /// Language model endpoint settings.
    pub llm: LLMConfig,
    /// Embedding endpoint settings.
    pub embedding: EmbeddingConfig,
    /// Retrieval and history tuning knobs.
    pub rag: RAGConfig,
}

/// Qdrant connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct QdrantConfig {
    /// Qdrant server URL (gRPC port).
    pub url: String,
    /// Optional API key for hosted Qdrant.
    pub api_key: Option<String>,
    /// Collection holding the financial-document passages.
    pub collection_name: String,
}

/// OpenAI-compatible chat endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    /// API key for the endpoint.
    pub api_key: String,
    /// Base URL, OpenRouter by default.
    pub api_base: String,
    /// Model identifier passed on every request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token cap.
    pub max_tokens: u32,
}

/// OpenAI-compatible embeddings endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    /// Base URL of the embeddings API.
    pub api_base: String,
    /// Optional API key.
    pub api_key: Option<String>,
    /// Embedding model identifier.
    pub model: String,
}

/// Retrieval and memory tuning knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct RAGConfig {
    /// Number of passages requested from the index per query.
    pub top_k: usize,
    /// Most recent turns kept in the dialogue context; `None` disables the cap.
    pub history_window: Option<usize>,
    /// Deadline applied to each external call.
    pub request_timeout_secs: u64,
}

/// Default passage count per retrieval.
pub const DEFAULT_TOP_K: usize = 40;

/// Default dialogue-context window, in turns.
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

/// Default per-call deadline in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

impl AdvisorConfig {
    /// Load configuration from the environment (and `.env` if present).
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::Config`] when a required variable is missing
    /// or a numeric knob fails to parse.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(AdvisorConfig {
            qdrant: QdrantConfig {
                url: env::var("QDRANT_URL")
                    .unwrap_or_else(|_| "http://localhost:6334".to_string()),
                api_key: env::var("QDRANT_API_KEY").ok(),
                collection_name: require("COLLECTION_NAME")?,
            },
            llm: LLMConfig {
                api_key: require("OPENAI_API_KEY")?,
                api_base: env::var("OPENAI_API_BASE")
                    .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string()),
                model: require("MODEL_LLM_NAME")?,
                temperature: parse_var("LLM_TEMPERATURE", 0.4)?,
                max_tokens: parse_var("LLM_MAX_TOKENS", 2048)?,
            },
            embedding: EmbeddingConfig {
                api_base: require("EMBEDDING_API_BASE")?,
                api_key: env::var("EMBEDDING_API_KEY").ok(),
                model: env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "dangvantuan/vietnamese-embedding".to_string()),
            },
            rag: RAGConfig {
                top_k: parse_var("RAG_TOP_K", DEFAULT_TOP_K)?,
                history_window: parse_optional_window()?,
                request_timeout_secs: parse_var(
                    "REQUEST_TIMEOUT_SECS",
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                )?,
            },
        })
    }

    /// The per-call deadline as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.rag.request_timeout_secs)
    }
}

impl Default for RAGConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            history_window: Some(DEFAULT_HISTORY_WINDOW),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

fn require(key: &str) -> Result<String> {
    env::var(key).map_err(|_| AdvisorError::Config(format!("{} is not set", key)))
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AdvisorError::Config(format!("{} is not a valid value: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

// HISTORY_WINDOW=0 disables the cap entirely.
fn parse_optional_window() -> Result<Option<usize>> {
    let window: usize = parse_var("HISTORY_WINDOW", DEFAULT_HISTORY_WINDOW)?;
    Ok(if window == 0 { None } else { Some(window) })
}
