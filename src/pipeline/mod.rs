// src/pipeline/mod.rs

//! Normalization and preview generation for backend content fields.
//!
//! Stages, leaves first:
//! decode -> sanitize (full-content rendering)
//! decode -> sanitize -> plain_text -> truncate / preview (previews)
//!
//! Every function here is pure and total: absent or empty input gives empty
//! output, and no input makes a stage fail.

pub mod decode;
pub mod plain_text;
pub mod preview;
pub mod sanitize;
pub mod truncate;

pub use decode::normalize;
pub use plain_text::to_plain_text;
pub use preview::{
    PARAGRAPH_SEPARATOR, PreviewOptions, StructuredPreview, build_preview, build_preview_with,
    escape_html,
};
pub use sanitize::sanitize;
pub use truncate::{PreviewResult, truncate_words};

/// The full-content path: safe to inject directly into a page.
pub fn render_html(raw: Option<&str>) -> String {
    sanitize(&normalize(raw))
}

/// Plain text of a raw field. Sanitizing first keeps script bodies out of
/// the text.
pub fn plain_text(raw: Option<&str>) -> String {
    to_plain_text(&render_html(raw))
}

/// Single-line, word-bounded preview of a raw field.
pub fn excerpt(raw: Option<&str>, max_words: usize) -> PreviewResult {
    truncate_words(&plain_text(raw), max_words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_html_repairs_then_sanitizes() {
        let raw = r#""<p onclick="x()">Hi</p><script>bad()</script>""#;
        assert_eq!(render_html(Some(raw)), "<p>Hi</p>");
    }

    #[test]
    fn excerpt_flattens_paragraphs() {
        let result = excerpt(Some("<p>One two.</p><p>Three four five.</p>"), 4);
        assert_eq!(result.preview, "One two. Three four");
        assert!(result.truncated);
    }

    #[test]
    fn absent_fields_are_empty_everywhere() {
        assert_eq!(render_html(None), "");
        assert_eq!(plain_text(None), "");
        assert_eq!(excerpt(None, 10), PreviewResult::default());
    }
}
