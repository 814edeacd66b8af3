//! Language model abstraction.

use crate::types::{PromptPayload, Result};
use async_trait::async_trait;

/// Generic text-generation client.
///
/// Implementations receive the full [`PromptPayload`] so the dialogue
/// history reaches the provider as structured turns with role information
/// intact, never flattened into the system text.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Run one generation call for the composed prompt.
    async fn generate(&self, prompt: &PromptPayload) -> Result<GenerationOutput>;

    /// The model name/identifier.
    fn model_name(&self) -> &str;
}

/// Structured response from a generation request.
///
/// `answer` is optional: a provider can complete the HTTP exchange yet
/// return no usable answer field, and the orchestrator must handle that.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// The answer text, when the provider produced one.
    pub answer: Option<String>,
}
