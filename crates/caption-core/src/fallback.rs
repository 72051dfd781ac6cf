//! Local fallback captions.
//!
//! Used only when the completion provider fails, so the user always gets a
//! caption back. Deterministic in `(content, style)`; sentence and hashtag
//! counts are ignored.

use crate::Style;

/// Number of leading words kept from the content.
pub const FALLBACK_WORDS: usize = 8;

/// Build the fallback caption for `content` in `style`.
///
/// Words are split on single spaces, so runs of spaces yield empty words and
/// count toward the limit.
///
/// # Example
///
/// ```
/// use caption_core::{fallback_caption, Style};
///
/// assert_eq!(
///     fallback_caption("a b c d e f g h i j", Style::Professional),
///     "Elevate your professional presence with a b c d e f g h... #caption #professionalcontent #trending"
/// );
/// ```
pub fn fallback_caption(content: &str, style: Style) -> String {
    let words: Vec<&str> = content.split(' ').collect();
    let mut shortened = words
        .iter()
        .take(FALLBACK_WORDS)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if words.len() > FALLBACK_WORDS {
        shortened.push_str("...");
    }

    format!(
        "{}{} #caption #{}content #trending",
        style.fallback_prefix(),
        shortened,
        style
    )
}
