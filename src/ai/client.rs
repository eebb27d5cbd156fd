//! OpenAI-backed completion client.

use crate::config::{AIConfig, api_key_from_env};
use crate::error::{DatalensError, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use secrecy::{ExposeSecret as _, SecretString};
use tracing::debug;

/// A single-turn chat completion: system instructions plus one user prompt in,
/// raw model text out.
#[async_trait]
pub trait SemanticBackend: Send + Sync {
    /// Sends one completion request and returns the reply text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the service fails.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// [`SemanticBackend`] over the OpenAI chat completions API.
pub struct OpenAiBackend {
    client: Client<OpenAIConfig>,
    config: AIConfig,
}

impl OpenAiBackend {
    /// Creates a backend with an explicit API key.
    pub fn new(api_key: &SecretString, config: AIConfig) -> Self {
        let openai_config = OpenAIConfig::new().with_api_key(api_key.expose_secret());
        Self {
            client: Client::with_config(openai_config),
            config,
        }
    }

    /// Builds a backend from `OPENAI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`DatalensError::Config`] when the variable is unset or blank.
    pub fn from_env(config: AIConfig) -> Result<Self> {
        let key = api_key_from_env().ok_or_else(|| {
            DatalensError::Config(format!(
                "{} is not set",
                crate::config::API_KEY_ENV
            ))
        })?;
        Ok(Self::new(&key, config))
    }

    pub fn config(&self) -> &AIConfig {
        &self.config
    }
}

fn build_error(what: &str, err: impl std::fmt::Display) -> DatalensError {
    DatalensError::Ai(format!("Failed to build {what}: {err}"))
}

#[async_trait]
impl SemanticBackend for OpenAiBackend {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        if !self.config.enabled {
            return Err(DatalensError::Config("AI features are disabled".to_owned()));
        }

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()
                .map_err(|e| build_error("system message", e))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| build_error("user message", e))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(|e| build_error("chat completion request", e))?;

        debug!(model = %self.config.model, prompt_chars = prompt.len(), "Sending completion request");

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| DatalensError::Ai(format!("OpenAI API error: {e}")))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| DatalensError::Ai("No response content received".to_owned()))
    }
}
