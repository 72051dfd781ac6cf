//! Caption styles.
//!
//! A style selects the tone of a caption. Every table keyed by style is an
//! exhaustive `match`, so adding a variant fails to compile until each table
//! has an entry for it.

use crate::{CaptionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The tone requested for a generated caption.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Professional,
    Casual,
    Humorous,
    Inspirational,
    Promotional,
}

impl Style {
    /// All styles, in the order they are offered to the user.
    pub const ALL: [Style; 5] = [
        Style::Professional,
        Style::Casual,
        Style::Humorous,
        Style::Inspirational,
        Style::Promotional,
    ];

    /// Lowercase identifier used in prompts and fallback hashtags.
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Professional => "professional",
            Style::Casual => "casual",
            Style::Humorous => "humorous",
            Style::Inspirational => "inspirational",
            Style::Promotional => "promotional",
        }
    }

    /// Human-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Style::Professional => "Professional",
            Style::Casual => "Casual",
            Style::Humorous => "Humorous",
            Style::Inspirational => "Inspirational",
            Style::Promotional => "Promotional",
        }
    }

    /// Tone guidance appended to the user prompt.
    pub fn guidance(&self) -> &'static str {
        match self {
            Style::Professional => {
                "Keep the tone polished and credible, suitable for a business or LinkedIn audience."
            }
            Style::Casual => {
                "Keep the tone relaxed and conversational, like a post shared with friends."
            }
            Style::Humorous => {
                "Make it witty and lighthearted with a playful twist that makes readers smile."
            }
            Style::Inspirational => {
                "Make it uplifting and motivating, encouraging readers to take action or reflect."
            }
            Style::Promotional => {
                "Make it persuasive and action-oriented, highlighting value and ending with a clear call to action."
            }
        }
    }

    /// Opening phrase used by the local fallback caption.
    pub fn fallback_prefix(&self) -> &'static str {
        match self {
            Style::Professional => "Elevate your professional presence with ",
            Style::Casual => "Just hanging out with ",
            Style::Humorous => "Who needs perfection when you've got ",
            Style::Inspirational => "Embrace the journey and discover ",
            Style::Promotional => "Don't miss out on our amazing ",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = CaptionError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Style::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CaptionError::InvalidStyle(s.to_string()))
    }
}
