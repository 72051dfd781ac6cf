//! # Caption AI
//!
//! External service integrations for Caption Core.
//!
//! This crate provides ready-to-use implementations of the core seams:
//!
//! - **OpenAI**: chat-completion provider (default model `gpt-3.5-turbo`)
//! - **Web3Forms**: form relay for the feedback form
//!
//! ## Example
//!
//! ```rust,ignore
//! use caption_ai::OpenAiProvider;
//! use caption_core::{CaptionGenerator, StudioConfig};
//!
//! // Provider is built explicitly and handed to the generator
//! let provider = OpenAiProvider::from_env()?;
//! let generator = CaptionGenerator::new(provider, StudioConfig::from_env());
//!
//! generator.set_content("Weekend farmers market haul");
//! let caption = generator.generate().await?;
//! ```

pub mod openai;
pub mod web3forms;
pub mod error;

pub use openai::OpenAiProvider;
pub use web3forms::Web3FormsRelay;
pub use error::AiError;

/// Re-export core types for convenience.
pub use caption_core::{
    CaptionError, CaptionGenerator, CompletionProvider, FeedbackForm, ProviderConfig,
    RelayClient, Result, StudioConfig, Style,
};

/// Create an OpenAI provider with a single line.
///
/// # Example
///
/// ```rust,ignore
/// let provider = caption_ai::openai("gpt-4o-mini")?;
/// ```
pub fn openai(model: &str) -> Result<OpenAiProvider> {
    OpenAiProvider::from_env_with_model(model)
}

/// Create a Web3Forms relay for the endpoint in `config`.
pub fn web3forms(config: &StudioConfig) -> Result<Web3FormsRelay> {
    Web3FormsRelay::with_url(config.relay_url.clone())
}
