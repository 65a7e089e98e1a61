// src/pipeline/truncate.rs

use serde::Serialize;

/// Characters trimmed from the end of a cut preview so it never ends mid-clause.
pub(crate) const TRAILING_PUNCTUATION: &[char] =
    &[',', '.', ';', ':', '!', '?', '-', '\u{2013}', '\u{2014}'];

/// A single-line, word-bounded preview of plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreviewResult {
    pub preview: String,

    /// True iff words beyond `preview` were dropped.
    pub truncated: bool,
}

/// Caps `text` to `max_words` whitespace-separated words.
///
/// The words are re-joined with single spaces, so line and paragraph breaks
/// do not survive. When words are dropped, trailing punctuation is trimmed
/// from the cut.
pub fn truncate_words(text: &str, max_words: usize) -> PreviewResult {
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.len() <= max_words {
        return PreviewResult {
            preview: words.join(" "),
            truncated: false,
        };
    }

    let preview = words[..max_words].join(" ");

    PreviewResult {
        preview: trim_trailing_punctuation(&preview).to_string(),
        truncated: true,
    }
}

pub(crate) fn trim_trailing_punctuation(s: &str) -> &str {
    s.trim_end_matches(|c: char| TRAILING_PUNCTUATION.contains(&c) || c.is_whitespace())
}
