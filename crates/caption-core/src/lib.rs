//! # Caption Core
//!
//! Core library for AI-assisted social-media captions.
//!
//! This crate holds everything that does not talk to the network itself:
//! the request types, prompt construction, the local fallback caption, the
//! provider and relay traits, and the two small state machines that drive
//! the caption form and the feedback form.
//!
//! ## Features
//!
//! - Closed [`Style`] enumeration with exhaustive guidance and prefix tables
//! - Deterministic fallback when the completion provider fails
//! - One-request-at-a-time generation and submission
//! - Self-dismissing UI flags tied to their owner's lifetime
//!
//! ## Example
//!
//! ```rust
//! use caption_core::{CaptionGenerator, MockProvider, Origin, StudioConfig};
//!
//! # tokio_test::block_on(async {
//! let generator = CaptionGenerator::new(MockProvider::failing(), StudioConfig::default());
//! generator.set_content("fresh bread every morning");
//!
//! let caption = generator.generate().await.unwrap();
//! assert_eq!(caption.origin, Origin::Fallback);
//! # });
//! ```

pub mod error;
pub mod style;
pub mod request;
pub mod prompt;
pub mod fallback;
pub mod provider;
pub mod clipboard;
pub mod flag;
pub mod config;
pub mod generator;
pub mod feedback;

pub use error::{CaptionError, Result};
pub use style::Style;
pub use request::{GenerationRequest, GenerationResult, HashtagCount, Origin, SentenceCount};
pub use prompt::Prompt;
pub use fallback::fallback_caption;
pub use provider::{CompletionProvider, MockProvider, ProviderConfig};
pub use clipboard::{Clipboard, MemoryClipboard};
pub use flag::{TimerScope, TransientFlag};
pub use config::StudioConfig;
pub use generator::{CaptionGenerator, Phase};
pub use feedback::{
    FeedbackForm, FeedbackSubmission, RelayClient, RelayResponse, SubmitOutcome, SubmitPhase,
};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        CaptionError, CaptionGenerator, CompletionProvider, FeedbackForm, GenerationRequest,
        GenerationResult, Prompt, ProviderConfig, RelayClient, Result, Style, StudioConfig,
    };
}
