// src/pipeline/decode.rs

use regex::Regex;
use std::sync::LazyLock;

/// Literal `\u003C`, `\u003E` and `\u0026` sequences left behind by a
/// payload that was JSON-escaped twice.
static ESCAPED_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\\u00(3c|3e|26)").unwrap());

static PARAGRAPH_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<p>|</p>").unwrap());

static BLANK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(?:\s|&nbsp;)*$").unwrap());

/// Repairs a raw content field before it is rendered or previewed.
///
/// * Absent or empty input yields an empty string.
/// * Doubly escaped angle brackets and ampersands are restored.
/// * A single pair of matching outer quotes (`"…"` or `'…'`) is removed.
/// * Empty paragraphs (`<p></p>`, `<p> </p>`) are dropped.
/// * Leading and trailing whitespace is trimmed.
///
/// No HTML parsing happens here; only `<p>` and `</p>` tags are tracked.
pub fn normalize(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return String::new();
    };

    let repaired = ESCAPED_MARKUP.replace_all(raw, |caps: &regex::Captures| {
        match caps[1].to_ascii_lowercase().as_str() {
            "3c" => "<",
            "3e" => ">",
            _ => "&",
        }
    });

    let unquoted = strip_outer_quotes(repaired.trim());

    remove_empty_paragraphs(unquoted).trim().to_string()
}

/// Strips exactly one pair of matching quote characters wrapping the whole value.
fn strip_outer_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Drops `<p>`…`</p>` pairs that enclose only whitespace, `&nbsp;` or other
/// empty paragraphs, so `<p> <p></p> </p>` goes entirely.
///
/// Single pass over the paragraph tags with a stack of open paragraphs;
/// nesting depth does not multiply the work.
fn remove_empty_paragraphs(s: &str) -> String {
    // (offset of the `<p>` in `out`, only blanks seen since it opened)
    let mut open: Vec<(usize, bool)> = Vec::new();
    let mut out = String::with_capacity(s.len());
    let mut last = 0;

    for tag in PARAGRAPH_TAG.find_iter(s) {
        let text = &s[last..tag.start()];
        out.push_str(text);
        if !BLANK.is_match(text) {
            if let Some(top) = open.last_mut() {
                top.1 = false;
            }
        }
        last = tag.end();

        if tag.as_str().starts_with("</") {
            match open.pop() {
                Some((start, true)) => out.truncate(start),
                Some(_) => {
                    out.push_str(tag.as_str());
                    if let Some(parent) = open.last_mut() {
                        parent.1 = false;
                    }
                }
                None => out.push_str(tag.as_str()),
            }
        } else {
            open.push((out.len(), true));
            out.push_str(tag.as_str());
        }
    }

    out.push_str(&s[last..]);
    out
}
