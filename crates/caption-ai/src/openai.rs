//! OpenAI provider implementation.
//!
//! Sends the caption prompt to the Chat Completions API and returns the first
//! choice's text untouched.

use crate::AiError;
use caption_core::{CaptionError, CompletionProvider, Prompt, ProviderConfig, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI provider for caption generation.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    config: ProviderConfig,
}

/// OpenAI chat completion request.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Outgoing chat message.
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// OpenAI chat completion response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider with the given configuration.
    ///
    /// No request timeout is set beyond the transport defaults.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| CaptionError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables.
    ///
    /// Reads `CAPTION_API_KEY`/`OPENAI_API_KEY` and optionally `CAPTION_MODEL`.
    /// A missing key is accepted here; completions will fail and callers fall
    /// back to their local caption.
    pub fn from_env() -> Result<Self> {
        Self::new(ProviderConfig::from_env())
    }

    /// Create a provider from environment with a specific model.
    pub fn from_env_with_model(model: &str) -> Result<Self> {
        Self::new(ProviderConfig::from_env().with_model(model))
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn chat(&self, prompt: &Prompt) -> std::result::Result<String, AiError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AiError::MissingApiKey)?;

        let api_request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let url = self.config.base_url.as_deref().unwrap_or(OPENAI_API_URL);

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&api_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        if let Some(usage) = &chat_response.usage {
            debug!(total_tokens = usage.total_tokens, "OpenAI usage");
        }

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AiError::EmptyResponse)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.model))]
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        debug!("Requesting chat completion from OpenAI");
        Ok(self.chat(prompt).await?)
    }
}
