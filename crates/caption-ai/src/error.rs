//! Integration-specific error types.

use thiserror::Error;

/// Errors raised while talking to an external service.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
    },

    /// No API key was configured.
    #[error("API key not configured")]
    MissingApiKey,

    /// The completion response had no choices.
    #[error("Response contained no completion choices")]
    EmptyResponse,

    /// Response parsing failed.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl From<AiError> for caption_core::CaptionError {
    fn from(e: AiError) -> Self {
        match e {
            AiError::HttpError(e) => caption_core::CaptionError::NetworkError(e.to_string()),
            other => caption_core::CaptionError::ProviderError(other.to_string()),
        }
    }
}
