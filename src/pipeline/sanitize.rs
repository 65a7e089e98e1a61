// src/pipeline/sanitize.rs

use regex::{Captures, Regex};
use std::sync::LazyLock;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());

/// An opening `<script>` whose closing tag never arrives.
static DANGLING_SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<script\b[^>]*>").unwrap());

/// An opening (or self-closing) tag. Quoted attribute values may contain `>`.
static OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<[a-zA-Z][^>"']*(?:(?:"[^"]*"|'[^']*')[^>"']*)*>"#).unwrap()
});

static TAG_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^<[a-zA-Z][^\s/>"'=]*"#).unwrap());

/// One attribute after the tag name: separator, name, optional value.
/// Browsers accept `/` or nothing at all (after a quoted value) as the separator.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([\s/]*)([^\s"'<>/=]+)(?:\s*=\s*("[^"]*"|'[^']*'|[^\s"'>]+))?"#).unwrap()
});

/// Strips active content from an HTML fragment bound for direct injection.
///
/// This is a targeted denylist for admin-authored content, not an allow-list
/// sanitizer:
/// 1. `<script>` blocks are removed together with their body.
/// 2. `on*` event-handler attributes are dropped.
/// 3. `href`/`src` values using the `javascript:` scheme become `#`.
///
/// Every other tag and attribute passes through untouched.
pub fn sanitize(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let without_scripts = SCRIPT_BLOCK.replace_all(html, "");
    let without_scripts = DANGLING_SCRIPT.replace_all(&without_scripts, "");

    OPEN_TAG
        .replace_all(&without_scripts, |caps: &Captures| clean_tag(&caps[0]))
        .into_owned()
}

fn clean_tag(tag: &str) -> String {
    let name_end = TAG_NAME.find(tag).map_or(0, |m| m.end());
    let (name, attributes) = tag.split_at(name_end);
    format!("{}{}", name, ATTRIBUTE.replace_all(attributes, clean_attribute))
}

fn clean_attribute(caps: &Captures) -> String {
    let name = &caps[2];
    let Some(value) = caps.get(3).map(|m| m.as_str()) else {
        return caps[0].to_string();
    };

    if is_event_handler(name) {
        tracing::trace!(attribute = name, "dropping event handler");
        return String::new();
    }

    if is_url_attribute(name) && is_script_uri(value) {
        let quote = match value.chars().next() {
            Some(q @ ('"' | '\'')) => q,
            _ => '"',
        };
        return format!("{}{}={quote}#{quote}", &caps[1], name);
    }

    caps[0].to_string()
}

/// `on` followed by letters only: `onclick`, `onError`, `onmouseover`.
fn is_event_handler(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() > 2
        && bytes[..2].eq_ignore_ascii_case(b"on")
        && bytes[2..].iter().all(u8::is_ascii_alphabetic)
}

fn is_url_attribute(name: &str) -> bool {
    name.eq_ignore_ascii_case("href") || name.eq_ignore_ascii_case("src")
}

// Only `javascript:` is neutralized; `data:` image URIs must keep working.
fn is_script_uri(value: &str) -> bool {
    let unquoted = value
        .strip_prefix(['"', '\''])
        .and_then(|v| v.strip_suffix(['"', '\'']))
        .unwrap_or(value);

    unquoted
        .trim_start()
        .get(..11)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
}
