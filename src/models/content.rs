// src/models/content.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::pipeline::PreviewOptions;

/// Upper bound on a single content field, in characters.
pub const MAX_CONTENT_CHARS: usize = 200_000;

/// A content field exactly as the content API stored it.
///
/// Deserialization never fails: strings are kept, numbers and booleans are
/// coerced to text, and `null`, arrays or objects count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawField(Option<String>);

impl RawField {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<'de> Deserialize<'de> for RawField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let text = match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        };
        Ok(RawField(text))
    }
}

/// Kinds of content the site previews, each with its own default word limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Article,
    Magazine,
    Research,
    Monologue,
    /// "Timeline of Thought" entries.
    Timeline,
    Shop,
    Youtube,
    MetaDescription,
}

impl ContentKind {
    pub fn default_max_words(self) -> usize {
        match self {
            ContentKind::Article => 60,
            ContentKind::Research => 50,
            ContentKind::Monologue => 45,
            ContentKind::Magazine | ContentKind::Timeline => 40,
            ContentKind::Youtube => 30,
            ContentKind::Shop | ContentKind::MetaDescription => 25,
        }
    }
}

/// Picks the word limit: explicit value, then the kind's default, then `fallback`.
/// Negative limits behave as zero.
pub fn resolve_max_words(max_words: Option<i64>, kind: Option<ContentKind>, fallback: usize) -> usize {
    match max_words {
        Some(n) => usize::try_from(n).unwrap_or(0),
        None => kind.map_or(fallback, ContentKind::default_max_words),
    }
}

fn validate_content(content: &RawField) -> Result<(), validator::ValidationError> {
    let too_long = content
        .as_deref()
        .is_some_and(|s| s.chars().count() > MAX_CONTENT_CHARS);
    if too_long {
        return Err(validator::ValidationError::new("content_too_long")
            .with_message(format!("Content must be at most {} chars", MAX_CONTENT_CHARS).into()));
    }
    Ok(())
}

/// DTO for endpoints that take a single content field.
#[derive(Debug, Deserialize, Validate)]
pub struct ContentRequest {
    #[serde(default)]
    #[validate(custom(function = validate_content))]
    pub content: RawField,
}

/// DTO for a single-line excerpt.
#[derive(Debug, Deserialize, Validate)]
pub struct ExcerptRequest {
    #[serde(default)]
    #[validate(custom(function = validate_content))]
    pub content: RawField,

    #[validate(range(max = 10000, message = "max_words must be at most 10000"))]
    pub max_words: Option<i64>,

    pub kind: Option<ContentKind>,
}

/// DTO for a structured, paragraph-preserving preview.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PreviewRequest {
    #[serde(default)]
    #[validate(custom(function = validate_content))]
    pub content: RawField,

    #[validate(length(max = 200, message = "cut_phrase must be at most 200 chars"))]
    pub cut_phrase: Option<String>,

    #[validate(range(max = 10000, message = "max_words must be at most 10000"))]
    pub max_words: Option<i64>,

    pub kind: Option<ContentKind>,

    /// HTML-escape the preview text (default: true).
    #[serde(default = "default_escape")]
    pub escape: bool,
}

fn default_escape() -> bool {
    true
}

impl PreviewRequest {
    pub fn options(&self, fallback_max_words: usize) -> PreviewOptions {
        PreviewOptions {
            max_words: resolve_max_words(self.max_words, self.kind, fallback_max_words),
            cut_phrase: self.cut_phrase.clone(),
            escape_output: self.escape,
        }
    }
}

/// DTO for previewing a listing page worth of fields at once.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchPreviewRequest {
    #[validate(length(min = 1, max = 100, message = "items must hold between 1 and 100 entries"))]
    #[validate(nested)]
    pub items: Vec<PreviewRequest>,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub html: String,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub html: String,

    /// Nothing renderable survived; the client shows its fallback message.
    pub is_empty: bool,
}

#[derive(Debug, Serialize)]
pub struct PlainTextResponse {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_field_accepts_any_json_value() {
        let parse = |json: &str| serde_json::from_str::<RawField>(json).unwrap();

        assert_eq!(parse(r#""<p>Hi</p>""#), RawField::new("<p>Hi</p>"));
        assert_eq!(parse("42"), RawField::new("42"));
        assert_eq!(parse("true"), RawField::new("true"));
        assert_eq!(parse("null"), RawField::default());
        assert_eq!(parse("[1, 2]"), RawField::default());
        assert_eq!(parse(r#"{"a": 1}"#), RawField::default());
    }

    #[test]
    fn missing_content_is_absent() {
        let req: ContentRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.content.as_deref(), None);
    }

    #[test]
    fn word_limit_resolution_order() {
        assert_eq!(resolve_max_words(Some(7), Some(ContentKind::Article), 40), 7);
        assert_eq!(resolve_max_words(Some(-3), None, 40), 0);
        assert_eq!(resolve_max_words(None, Some(ContentKind::Shop), 40), 25);
        assert_eq!(resolve_max_words(None, None, 40), 40);
    }

    #[test]
    fn preview_request_defaults_to_escaped_output() {
        let req: PreviewRequest =
            serde_json::from_str(r#"{"content": "x", "kind": "meta_description"}"#).unwrap();
        let options = req.options(40);
        assert!(options.escape_output);
        assert_eq!(options.max_words, 25);
        assert_eq!(options.cut_phrase, None);
    }

    #[test]
    fn oversized_phrase_fails_validation() {
        let req = PreviewRequest {
            content: RawField::new("x"),
            cut_phrase: Some("a".repeat(201)),
            max_words: None,
            kind: None,
            escape: true,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn oversized_content_fails_validation() {
        let req = ContentRequest {
            content: RawField::new("x".repeat(MAX_CONTENT_CHARS + 1)),
        };
        assert!(req.validate().is_err());

        let req = ContentRequest {
            content: RawField::new("x".repeat(MAX_CONTENT_CHARS)),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn raw_field_serializes_as_its_text() {
        assert_eq!(serde_json::to_string(&RawField::new("hi")).unwrap(), r#""hi""#);
        assert_eq!(serde_json::to_string(&RawField::default()).unwrap(), "null");
    }

    #[test]
    fn batch_validates_each_item() {
        let req = BatchPreviewRequest {
            items: vec![PreviewRequest {
                content: RawField::new("x"),
                cut_phrase: None,
                max_words: Some(20_000),
                kind: None,
                escape: true,
            }],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn empty_batch_fails_validation() {
        let req = BatchPreviewRequest { items: Vec::new() };
        assert!(req.validate().is_err());
    }
}
