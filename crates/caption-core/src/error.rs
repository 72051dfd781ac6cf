//! Error types for Caption Core.

use thiserror::Error;

/// Result type alias for caption operations.
pub type Result<T> = std::result::Result<T, CaptionError>;

/// Main error type for caption generation and feedback submission.
#[derive(Debug, Error)]
pub enum CaptionError {
    /// Generation requested with blank content.
    #[error("Content is empty")]
    EmptyContent,

    /// A generation is already in flight.
    #[error("A caption is already being generated")]
    GenerationInProgress,

    /// A feedback submission is already in flight.
    #[error("Feedback is already being submitted")]
    SubmissionInProgress,

    /// A required feedback field was left blank.
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    /// The feedback email address is not shaped like one.
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    /// Copy requested with no caption to copy.
    #[error("Nothing to copy")]
    NothingToCopy,

    /// Copy requested while the previous copy is still being acknowledged.
    #[error("Caption was just copied")]
    AlreadyCopied,

    /// Unknown caption style name.
    #[error("Unknown caption style '{0}'")]
    InvalidStyle(String),

    /// A bounded count was outside its allowed range.
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        min: u8,
        max: u8,
        value: u8,
    },

    /// Completion provider returned an error.
    #[error("AI provider error: {0}")]
    ProviderError(String),

    /// Network request failed.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Form relay rejected or failed the submission.
    #[error("Relay error: {0}")]
    RelayError(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Clipboard write failed.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
