// src/pipeline/preview.rs

use regex::{Captures, Regex, RegexBuilder};
use serde::Serialize;
use std::sync::LazyLock;

use super::{plain_text, truncate::trim_trailing_punctuation};

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// A character that needs escaping, or an entity that is already escaped.
static ESCAPABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"&(?:[a-zA-Z][a-zA-Z0-9]{0,31}|#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6});|[&<>"']"#)
        .unwrap()
});

/// Paragraph separator in rendered previews.
pub const PARAGRAPH_SEPARATOR: &str = "<br/><br/>";

/// A preview fragment ready to sit next to literal markup in a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructuredPreview {
    pub html: String,

    /// True iff content after the preview was dropped.
    /// Drives the "Continue to Read" link.
    pub truncated: bool,
}

/// Per-call knobs for [`build_preview_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOptions {
    pub max_words: usize,

    /// Cut at the first case-insensitive occurrence of this phrase, matched
    /// exactly as given (surrounding spaces included), instead of counting
    /// words. Blank phrases are ignored.
    pub cut_phrase: Option<String>,

    /// HTML-escape each paragraph. Disable only if the caller escapes.
    pub escape_output: bool,
}

impl PreviewOptions {
    pub fn new(max_words: usize) -> Self {
        Self {
            max_words,
            cut_phrase: None,
            escape_output: true,
        }
    }

    pub fn cut_at(mut self, phrase: impl Into<String>) -> Self {
        self.cut_phrase = Some(phrase.into());
        self
    }

    pub fn unescaped(mut self) -> Self {
        self.escape_output = false;
        self
    }
}

/// Builds a paragraph-preserving preview of a raw content field.
///
/// An empty `cut_phrase` means "cut by word count only".
pub fn build_preview(html: Option<&str>, cut_phrase: &str, max_words: usize) -> StructuredPreview {
    build_preview_with(html, &PreviewOptions::new(max_words).cut_at(cut_phrase))
}

/// Builds a preview with explicit [`PreviewOptions`].
///
/// 1. The field is normalized, stripped of scripts and flattened to plain
///    text (paragraphs kept).
/// 2. If the cut phrase occurs, everything from it onwards is dropped and the
///    preview is always reported as truncated, even when the phrase opens
///    the text.
/// 3. Otherwise the text is cut after `max_words` words.
/// 4. The surviving text is split into paragraphs, each escaped on its own,
///    and the paragraphs are joined with [`PARAGRAPH_SEPARATOR`].
pub fn build_preview_with(html: Option<&str>, options: &PreviewOptions) -> StructuredPreview {
    let text = plain_text(html);
    if text.is_empty() {
        return StructuredPreview::default();
    }

    let phrase_cut = options
        .cut_phrase
        .as_deref()
        .filter(|phrase| !phrase.trim().is_empty())
        .and_then(|phrase| find_phrase(&text, phrase));

    let (cut, truncated) = match phrase_cut {
        Some(index) => (text[..index].trim_end(), true),
        None => cut_at_word_limit(&text, options.max_words),
    };

    StructuredPreview {
        html: render_paragraphs(cut, options.escape_output),
        truncated,
    }
}

/// Byte offset of the first case-insensitive match of `phrase` in `text`.
fn find_phrase(text: &str, phrase: &str) -> Option<usize> {
    let matcher = RegexBuilder::new(&regex::escape(phrase))
        .case_insensitive(true)
        .build()
        .ok()?;

    let found = matcher.find(text).map(|m| m.start());
    if found.is_none() {
        tracing::debug!(phrase, "cut phrase not found, falling back to word limit");
    }
    found
}

/// Slices `text` right after its `max_words`-th word so that the line and
/// paragraph breaks before the cut survive.
fn cut_at_word_limit(text: &str, max_words: usize) -> (&str, bool) {
    if max_words == 0 {
        return ("", WORD.is_match(text));
    }

    let mut words = WORD.find_iter(text);
    match words.nth(max_words - 1) {
        Some(last) if words.next().is_some() => {
            (trim_trailing_punctuation(&text[..last.end()]), true)
        }
        _ => (text, false),
    }
}

fn render_paragraphs(text: &str, escape: bool) -> String {
    PARAGRAPH_BREAK
        .split(text)
        .map(|paragraph| {
            if escape {
                escape_html(paragraph)
            } else {
                paragraph.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}

/// Escapes `& < > " '` while leaving well-formed entity references intact,
/// so `&amp;` from the source is not turned into `&amp;amp;`.
pub fn escape_html(text: &str) -> String {
    ESCAPABLE
        .replace_all(text, |caps: &Captures| {
            let matched = &caps[0];
            match matched {
                "&" => "&amp;".to_string(),
                "<" => "&lt;".to_string(),
                ">" => "&gt;".to_string(),
                "\"" => "&quot;".to_string(),
                "'" => "&#39;".to_string(),
                entity => entity.to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOX: &str = r"\u003Cp\u003EThe quick brown fox jumps over the lazy dog.\u003C/p\u003E";

    #[test]
    fn empty_input_short_circuits() {
        assert_eq!(build_preview(None, "", 10), StructuredPreview::default());
        assert_eq!(build_preview(Some(""), "more", 0), StructuredPreview::default());
        assert_eq!(build_preview(Some("<p></p>"), "", 3), StructuredPreview::default());
    }

    #[test]
    fn word_limit_on_escaped_payload() {
        let preview = build_preview(Some(FOX), "", 4);
        assert_eq!(preview.html, "The quick brown fox");
        assert!(preview.truncated);
    }

    #[test]
    fn short_content_is_not_truncated() {
        let preview = build_preview(Some("<p>Hi there</p>"), "", 10);
        assert_eq!(preview.html, "Hi there");
        assert!(!preview.truncated);
    }

    #[test]
    fn paragraphs_become_line_breaks() {
        let preview = build_preview(Some("<p>First one.</p><p>Second one.</p>"), "", 10);
        assert_eq!(preview.html, "First one.<br/><br/>Second one.");
        assert!(!preview.truncated);
    }

    #[test]
    fn word_cut_keeps_earlier_paragraphs() {
        let preview = build_preview(Some("<p>One two.</p><p>Three four, five six.</p>"), "", 4);
        assert_eq!(preview.html, "One two.<br/><br/>Three four");
        assert!(preview.truncated);
    }

    #[test]
    fn cut_phrase_wins_over_word_limit() {
        let html = "<p>Intro text here.</p><p>Read More about it</p>";
        let preview = build_preview(Some(html), "read more", 2);
        assert_eq!(preview.html, "Intro text here.");
        assert!(preview.truncated);
    }

    #[test]
    fn cut_phrase_is_matched_with_its_spaces() {
        let html = "<p>Furthermore, there is more here.</p>";
        let preview = build_preview(Some(html), " more", 50);
        assert_eq!(preview.html, "Furthermore, there is");
        assert!(preview.truncated);
    }

    #[test]
    fn phrase_at_start_reports_truncated() {
        let preview = build_preview(Some("<p>Continue reading below</p>"), "continue", 50);
        assert_eq!(preview.html, "");
        assert!(preview.truncated);
    }

    #[test]
    fn missing_or_blank_phrase_falls_back_to_words() {
        let preview = build_preview(Some("<p>a b c d</p>"), "zzz", 2);
        assert_eq!(preview.html, "a b");
        assert!(preview.truncated);

        let preview = build_preview(Some("<p>a b c d</p>"), "   ", 2);
        assert_eq!(preview.html, "a b");
    }

    #[test]
    fn zero_words_yields_empty_truncated_preview() {
        let preview = build_preview(Some("<p>words</p>"), "", 0);
        assert_eq!(preview, StructuredPreview { html: String::new(), truncated: true });
    }

    #[test]
    fn escapes_text_without_double_escaping_entities() {
        let preview = build_preview(Some("<p>Tom &amp; Jerry say \"hi\" & 'bye' 1<2</p>"), "", 20);
        assert_eq!(
            preview.html,
            "Tom &amp; Jerry say &quot;hi&quot; &amp; &#39;bye&#39; 1&lt;2"
        );
    }

    #[test]
    fn unescaped_output_is_joined_verbatim() {
        let options = PreviewOptions::new(10).unescaped();
        let preview = build_preview_with(Some("<p>a &lt; b</p><p>c</p>"), &options);
        assert_eq!(preview.html, "a &lt; b<br/><br/>c");
    }

    #[test]
    fn escape_html_handles_numeric_entities() {
        assert_eq!(escape_html("&#8212; &#x2014; &copy &"), "&#8212; &#x2014; &amp;copy &amp;");
    }
}
