//! Prompt construction for caption generation.
//!
//! Turns a [`GenerationRequest`] into the system/user instruction pair sent to
//! the completion provider. Pure: no I/O, no validation beyond what the
//! request types already guarantee.

use crate::GenerationRequest;
use serde::{Deserialize, Serialize};

/// A system/user instruction pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prompt {
    /// Persona and tone for the model.
    pub system: String,

    /// Content plus the caption constraints.
    pub user: String,
}

impl Prompt {
    /// Create a prompt from raw parts.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Build the caption prompt for a request.
    ///
    /// # Example
    ///
    /// ```
    /// use caption_core::{GenerationRequest, Prompt, Style};
    ///
    /// let request = GenerationRequest::new("our new coffee blend").with_style(Style::Casual);
    /// let prompt = Prompt::build(&request);
    ///
    /// assert!(prompt.system.contains("casual style captions"));
    /// assert!(prompt.user.contains("our new coffee blend"));
    /// ```
    pub fn build(request: &GenerationRequest) -> Self {
        let style = request.style;

        let system = format!(
            "You are a caption generator that creates engaging {} style captions for social media.",
            style
        );

        let sentences = match request.sentence_count.get() {
            1 => "The caption must be exactly 1 sentence long.".to_string(),
            n => format!("The caption must be exactly {} sentences long.", n),
        };

        let hashtags = match request.hashtag_count.get() {
            0 => "Do not include any hashtags.".to_string(),
            1 => "Include exactly 1 relevant hashtag.".to_string(),
            n => format!("Include exactly {} relevant hashtags.", n),
        };

        let user = format!(
            "Create a {} caption for this content: {}.\n{}\n{}\nInclude relevant emojis.\n{}",
            style,
            request.content,
            sentences,
            hashtags,
            style.guidance()
        );

        Self { system, user }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HashtagCount, SentenceCount, Style};

    fn request(style: Style, sentences: u8, hashtags: u8) -> GenerationRequest {
        GenerationRequest::new("sunrise hike with the team")
            .with_style(style)
            .with_sentences(SentenceCount::new(sentences).unwrap())
            .with_hashtags(HashtagCount::new(hashtags).unwrap())
    }

    #[test]
    fn test_system_prompt_names_style() {
        let prompt = Prompt::build(&request(Style::Inspirational, 2, 3));
        assert_eq!(
            prompt.system,
            "You are a caption generator that creates engaging inspirational style captions for social media."
        );
    }

    #[test]
    fn test_user_prompt_carries_constraints() {
        let prompt = Prompt::build(&request(Style::Humorous, 3, 2));

        assert!(prompt
            .user
            .starts_with("Create a humorous caption for this content: sunrise hike with the team."));
        assert!(prompt.user.contains("exactly 3 sentences"));
        assert!(prompt.user.contains("exactly 2 relevant hashtags"));
        assert!(prompt.user.contains("emojis"));
        assert!(prompt.user.ends_with(Style::Humorous.guidance()));
    }

    #[test]
    fn test_singular_and_zero_counts() {
        let prompt = Prompt::build(&request(Style::Casual, 1, 0));
        assert!(prompt.user.contains("exactly 1 sentence long"));
        assert!(prompt.user.contains("Do not include any hashtags."));

        let prompt = Prompt::build(&request(Style::Casual, 1, 1));
        assert!(prompt.user.contains("exactly 1 relevant hashtag."));
    }

    #[test]
    fn test_every_style_has_distinct_guidance() {
        let guidance: std::collections::HashSet<_> =
            Style::ALL.iter().map(|s| s.guidance()).collect();
        assert_eq!(guidance.len(), Style::ALL.len());
    }
}
