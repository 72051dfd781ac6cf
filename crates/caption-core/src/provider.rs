//! Completion provider trait and configuration.
//!
//! Defines the capability the caption generator depends on. Concrete backends
//! live in `caption-ai`; [`MockProvider`] stands in for them in tests.

use crate::{CaptionError, Prompt, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Configuration for a completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key for authentication. A missing key is not rejected up front;
    /// every completion simply fails.
    pub api_key: Option<String>,

    /// Model identifier (e.g., "gpt-3.5-turbo").
    pub model: String,

    /// Base URL for the API.
    pub base_url: Option<String>,

    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            max_tokens: None,
            temperature: None,
        }
    }
}

impl ProviderConfig {
    /// Create a new provider config with API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            model: model.into(),
            ..Self::default()
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp.clamp(0.0, 2.0));
        self
    }

    /// Load config from environment variables.
    ///
    /// Expected variables:
    /// - `CAPTION_API_KEY` or `OPENAI_API_KEY` (optional)
    /// - `CAPTION_MODEL` (defaults to "gpt-3.5-turbo")
    /// - `CAPTION_BASE_URL` (optional)
    pub fn from_env() -> Self {
        let mut config = Self {
            api_key: std::env::var("CAPTION_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok()
                .filter(|key| !key.trim().is_empty()),
            ..Self::default()
        };

        if let Ok(model) = std::env::var("CAPTION_MODEL") {
            config.model = model;
        }
        if let Ok(url) = std::env::var("CAPTION_BASE_URL") {
            config = config.with_base_url(url);
        }

        config
    }
}

/// Capability to turn a prompt into generated text.
///
/// Implementations perform exactly one attempt per call and return the
/// provider's text verbatim. Any failure is an `Err`; callers do not
/// distinguish between failure kinds.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Submit a prompt and return the generated text.
    async fn complete(&self, prompt: &Prompt) -> Result<String>;
}

#[async_trait]
impl<P: CompletionProvider + ?Sized> CompletionProvider for std::sync::Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        (**self).complete(prompt).await
    }
}

/// A mock provider for testing.
#[derive(Debug, Default)]
pub struct MockProvider {
    reply: Option<String>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<Prompt>>,
}

impl MockProvider {
    /// A provider that answers every prompt with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            ..Self::default()
        }
    }

    /// A provider whose every call fails.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Number of completions requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent prompt received.
    pub fn last_prompt(&self) -> Option<Prompt> {
        self.last_prompt
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_prompt
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(prompt.clone());

        self.reply
            .clone()
            .ok_or_else(|| CaptionError::ProviderError("mock provider configured to fail".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_replies() {
        let provider = MockProvider::replying("Hello ☀️ #morning");
        let prompt = Prompt::new("system", "user");

        let text = provider.complete(&prompt).await.unwrap();
        assert_eq!(text, "Hello ☀️ #morning");
        assert_eq!(provider.calls(), 1);
        assert_eq!(provider.last_prompt(), Some(prompt));
    }

    #[tokio::test]
    async fn test_mock_provider_fails() {
        let provider = MockProvider::failing();
        let err = provider.complete(&Prompt::new("s", "u")).await.unwrap_err();
        assert!(matches!(err, CaptionError::ProviderError(_)));
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn test_config_builder() {
        let config = ProviderConfig::new("key", "gpt-4o")
            .with_base_url("http://localhost:9999")
            .with_temperature(5.0);

        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9999"));
        assert_eq!(config.temperature, Some(2.0));
    }

    #[test]
    fn test_default_config_has_no_key() {
        let config = ProviderConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
    }
}
