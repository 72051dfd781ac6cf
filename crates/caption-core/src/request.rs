//! Generation requests and results.

use crate::{CaptionError, Result, Style};
use serde::{Deserialize, Serialize};

macro_rules! bounded_count {
    ($(#[$meta:meta])* $name:ident, $label:literal, $min:literal ..= $max:literal, default = $default:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(try_from = "u8", into = "u8")]
        pub struct $name(u8);

        impl $name {
            pub const MIN: u8 = $min;
            pub const MAX: u8 = $max;

            /// Create a count, rejecting values outside the allowed range.
            pub fn new(value: u8) -> Result<Self> {
                if (Self::MIN..=Self::MAX).contains(&value) {
                    Ok(Self(value))
                } else {
                    Err(CaptionError::OutOfRange {
                        name: $label,
                        min: Self::MIN,
                        max: Self::MAX,
                        value,
                    })
                }
            }

            pub fn get(self) -> u8 {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self($default)
            }
        }

        impl TryFrom<u8> for $name {
            type Error = CaptionError;

            fn try_from(value: u8) -> Result<Self> {
                Self::new(value)
            }
        }

        impl From<$name> for u8 {
            fn from(count: $name) -> u8 {
                count.0
            }
        }
    };
}

bounded_count!(
    /// Number of sentences the caption should have (1 to 5).
    SentenceCount, "sentence count", 1..=5, default = 2
);

bounded_count!(
    /// Number of hashtags the caption should carry (0 to 4).
    HashtagCount, "hashtag count", 0..=4, default = 3
);

/// A single caption generation request.
///
/// Built from the form state at the moment the user asks for a caption and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Raw text the caption is about.
    pub content: String,

    /// Requested tone.
    pub style: Style,

    /// Exact number of sentences asked of the model.
    pub sentence_count: SentenceCount,

    /// Exact number of hashtags asked of the model.
    pub hashtag_count: HashtagCount,
}

impl GenerationRequest {
    /// Create a request with default style and counts.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: Style::default(),
            sentence_count: SentenceCount::default(),
            hashtag_count: HashtagCount::default(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_sentences(mut self, count: SentenceCount) -> Self {
        self.sentence_count = count;
        self
    }

    pub fn with_hashtags(mut self, count: HashtagCount) -> Self {
        self.hashtag_count = count;
        self
    }

    /// Whether the content has anything besides whitespace.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// Where a caption came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Returned by the completion provider.
    Remote,
    /// Computed locally after the provider failed.
    Fallback,
}

/// The caption currently shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationResult {
    pub text: String,
    pub origin: Origin,
}

impl GenerationResult {
    pub fn remote(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: Origin::Remote,
        }
    }

    pub fn fallback(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: Origin::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == Origin::Fallback
    }
}
