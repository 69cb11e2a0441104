//! Ahead-by extraction from a release page

use crate::core::{TagwatchError, TagwatchResult};
use regex::Regex;

/// First anchor whose href points at a compare view, capturing its inner HTML
const COMPARE_ANCHOR_PATTERN: &str =
    r#"(?is)<a\b[^>]*?\bhref\s*=\s*["'][^"']*/compare/[^"']*["'][^>]*>(.*?)</a\s*>"#;

/// Read the "commits since this tag" count from a release page.
///
/// Locates the first `<a>` whose `href` contains `/compare/` and keeps the
/// digits of its text content. Fails when no such anchor exists, which is
/// the case when the default branch still points at the tag.
pub fn extract_ahead_by(html: &str) -> TagwatchResult<String> {
    let re = Regex::new(COMPARE_ANCHOR_PATTERN)
        .map_err(|e| TagwatchError::GitHub(format!("Invalid regex pattern: {}", e)))?;

    let inner = re
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            TagwatchError::MissingElement("no compare link on the release page".to_string())
        })?;

    let count = digits_only(&text_content(inner));
    if count.is_empty() {
        return Err(TagwatchError::MissingElement(
            "compare link has no commit count".to_string(),
        ));
    }

    Ok(count)
}

/// Keep only ASCII digits
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Text of an HTML fragment: tags and character references removed
fn text_content(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    let mut in_entity = false;

    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            '&' if !in_tag => in_entity = true,
            ';' if in_entity => in_entity = false,
            _ if in_tag || in_entity => {}
            _ => text.push(c),
        }
    }

    text
}
