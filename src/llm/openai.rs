//! OpenAI-compatible chat client.
//!
//! Works against any endpoint speaking the OpenAI chat-completions
//! protocol; the reference deployment points it at OpenRouter.

use crate::config::LLMConfig;
use crate::llm::client::{GenerationOutput, LanguageModel};
use crate::types::{AdvisorError, PromptPayload, Result, TurnRole};
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

/// Chat client for OpenAI-compatible endpoints.
pub struct OpenAIChatModel {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIChatModel {
    /// Create a client for the given endpoint and model.
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);

        Self {
            client: Client::with_config(config),
            model,
            temperature: 0.4,
            max_tokens: 2048,
        }
    }

    /// Create a client from configuration, including sampling settings.
    pub fn from_config(config: &LLMConfig) -> Self {
        let mut client = Self::new(
            config.api_key.clone(),
            config.api_base.clone(),
            config.model.clone(),
        );
        client.temperature = config.temperature;
        client.max_tokens = config.max_tokens;
        client
    }

    /// System instruction first, then history turns in order, query last.
    fn build_messages(prompt: &PromptPayload) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages = Vec::with_capacity(prompt.dialogue_history.len() + 2);

        messages.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(prompt.system_instruction.clone())
                .build()
                .map_err(|e| AdvisorError::Generation(format!("Failed to build request: {}", e)))?
                .into(),
        );

        for turn in &prompt.dialogue_history {
            let message = match turn.role {
                TurnRole::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(turn.content.clone())
                    .build()
                    .map_err(|e| {
                        AdvisorError::Generation(format!("Failed to build request: {}", e))
                    })?
                    .into(),
                TurnRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(turn.content.clone())
                    .build()
                    .map_err(|e| {
                        AdvisorError::Generation(format!("Failed to build request: {}", e))
                    })?
                    .into(),
            };
            messages.push(message);
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.new_query.clone())
                .build()
                .map_err(|e| AdvisorError::Generation(format!("Failed to build request: {}", e)))?
                .into(),
        );

        Ok(messages)
    }
}

#[async_trait]
impl LanguageModel for OpenAIChatModel {
    async fn generate(&self, prompt: &PromptPayload) -> Result<GenerationOutput> {
        let messages = Self::build_messages(prompt)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| AdvisorError::Generation(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AdvisorError::Generation(format!("Chat API error: {}", e)))?;

        // A completed call can still come back without content; the
        // orchestrator substitutes the fixed no-answer sentence.
        let answer = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone());

        Ok(GenerationOutput { answer })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
