//! Summary text for posts that carry no `description` metadata
//!
//! This is a best-effort heuristic over the markdown body. The fallback order
//! matters more than the quality of any single rule.

use lazy_static::lazy_static;
use regex::Regex;

/// Used when nothing in the body qualifies
pub const GENERIC_DESCRIPTION: &str =
    "Comprehensive guide with practical examples and best practices.";

/// Paragraphs must be longer than this to be picked
const MIN_PARAGRAPH_CHARS: usize = 50;
const PARAGRAPH_LIMIT: usize = 200;
const LOOSE_MATCH_LIMIT: usize = 150;
const ELLIPSIS: &str = "...";

lazy_static! {
    static ref ATTRIBUTION_RE: Regex = Regex::new(r"\*\[w/ai\]\(\./ai/README\.md\)\*").unwrap();
    static ref LEADING_FRONTMATTER_RE: Regex = Regex::new(r"\A---(?s:.*?)---\n").unwrap();
    static ref TOP_HEADING_RE: Regex = Regex::new(r"(?m)^#[^#]").unwrap();
    static ref PARAGRAPH_BREAK_RE: Regex = Regex::new(r"\n\s*\n").unwrap();
    static ref LINK_RE: Regex = Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap();
    static ref BOLD_RE: Regex = Regex::new(r"\*\*([^*]+)\*\*").unwrap();
    static ref ITALIC_RE: Regex = Regex::new(r"\*([^*]+)\*").unwrap();
    static ref CODE_RE: Regex = Regex::new(r"`([^`]+)`").unwrap();
    static ref LOOSE_TEXT_RE: Regex = Regex::new(r"\n\n([^#\n]{50,})").unwrap();
}

/// Derive a description from a markdown body
pub fn describe(body: &str) -> String {
    let cleaned = clean_body(body);

    first_paragraph(&cleaned)
        .or_else(|| loose_match(&cleaned))
        .unwrap_or_else(|| GENERIC_DESCRIPTION.to_string())
}

/// Drop the attribution snippet and any leftover front-matter block
fn clean_body(body: &str) -> String {
    let without_attribution = ATTRIBUTION_RE.replace_all(body, "");
    LEADING_FRONTMATTER_RE
        .replace(&without_attribution, "")
        .into_owned()
}

/// First substantial paragraph after the first top-level heading
fn first_paragraph(cleaned: &str) -> Option<String> {
    let after_heading = TOP_HEADING_RE.split(cleaned).nth(1)?;

    let paragraph = PARAGRAPH_BREAK_RE
        .split(after_heading)
        .map(str::trim)
        .find(|p| is_prose(p))?;

    let plain = strip_inline_markdown(paragraph);
    Some(truncate_with_ellipsis(&plain, PARAGRAPH_LIMIT))
}

/// Any long run of text following a blank line
fn loose_match(cleaned: &str) -> Option<String> {
    let caps = LOOSE_TEXT_RE.captures(cleaned)?;
    let text = caps.get(1)?.as_str().trim();
    let mut description: String = text.chars().take(LOOSE_MATCH_LIMIT).collect();
    description.push_str(ELLIPSIS);
    Some(description)
}

fn is_prose(paragraph: &str) -> bool {
    paragraph.chars().count() > MIN_PARAGRAPH_CHARS
        && !["#", "*", "-", "1."]
            .iter()
            .any(|marker| paragraph.starts_with(marker))
}

/// Replace links, bold, italic and inline code with their inner text
pub fn strip_inline_markdown(text: &str) -> String {
    let text = LINK_RE.replace_all(text, "$1");
    let text = BOLD_RE.replace_all(&text, "$1");
    let text = ITALIC_RE.replace_all(&text, "$1");
    CODE_RE.replace_all(&text, "$1").into_owned()
}

fn truncate_with_ellipsis(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(limit).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
