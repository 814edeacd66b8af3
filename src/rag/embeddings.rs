//! Embedding providers.

use crate::config::EmbeddingConfig;
use crate::types::{AdvisorError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Maps text to a fixed-dimension vector for similarity search.
///
/// Deterministic for a fixed model and input; dimensionality is decided by
/// the external model and opaque to the pipeline.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for OpenAI-compatible `/embeddings` endpoints.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
}

impl HttpEmbeddingProvider {
    /// Create a provider for the given endpoint and model.
    pub fn new(api_base: String, api_key: Option<String>, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            api_key,
            model,
        }
    }

    /// Create a provider from configuration.
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self::new(
            config.api_base.clone(),
            config.api_key.clone(),
            config.model.clone(),
        )
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embeddings", self.api_base.trim_end_matches('/'));
        let body = EmbeddingRequest {
            model: &self.model,
            input: vec![text],
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AdvisorError::Embedding(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AdvisorError::Embedding(format!(
                "Embedding endpoint returned {}",
                response.status()
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AdvisorError::Embedding(format!("Malformed embedding response: {}", e)))?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AdvisorError::Embedding("Embedding response held no vectors".to_string()))
    }
}

/// fastembed-backed local embedding provider.
#[cfg(feature = "local-embeddings")]
pub mod local {
    use super::EmbeddingProvider;
    use crate::types::{AdvisorError, Result};
    use async_trait::async_trait;
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use parking_lot::Mutex;

    /// ONNX embedding model running in-process.
    pub struct FastembedProvider {
        // fastembed needs &mut for inference; the pipeline holds Arc<dyn _>.
        model: Mutex<TextEmbedding>,
    }

    impl FastembedProvider {
        /// Load the default multilingual-friendly model.
        pub fn new() -> Result<Self> {
            let model = TextEmbedding::try_new(
                InitOptions::new(EmbeddingModel::BGESmallENV15).with_show_download_progress(true),
            )
            .map_err(|e| AdvisorError::Embedding(e.to_string()))?;

            Ok(Self {
                model: Mutex::new(model),
            })
        }
    }

    #[async_trait]
    impl EmbeddingProvider for FastembedProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let mut vectors = self
                .model
                .lock()
                .embed(vec![text], None)
                .map_err(|e| AdvisorError::Embedding(e.to_string()))?;

            if vectors.is_empty() {
                return Err(AdvisorError::Embedding(
                    "Embedding model returned no vectors".to_string(),
                ));
            }
            Ok(vectors.remove(0))
        }
    }
}
