//! Snippet transclusion.
//!
//! Block directives (`<MadCap:snippetBlock src="…">`) are replaced by a
//! `snippet-content` div holding the snippet body. Inline directives
//! (`<MadCap:snippetText src="…">`) are replaced by the snippet content itself,
//! unwrapped from its paragraph so it flows with the surrounding text. Block
//! directives are resolved first. Fallback content written between a paired
//! directive's tags is replaced along with the directive.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::PassContext;
use crate::html::attr_value;

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<MadCap:snippetBlock\b([^>]*?)\s*(?:/>|>(?:.*?</MadCap:snippetBlock\s*>)?)")
        .unwrap()
});

static INLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<MadCap:snippetText\b([^>]*?)\s*(?:/>|>(?:.*?</MadCap:snippetText\s*>)?)")
        .unwrap()
});

static SINGLE_PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*<p\b[^>]*>(.*?)</p\s*>\s*$").unwrap());

/// Non-empty `src` attribute of a directive.
fn directive_src<'c>(caps: &'c Captures<'_>) -> Option<&'c str> {
    caps.get(1)
        .and_then(|attrs| attr_value(attrs.as_str(), "src"))
        .filter(|src| !src.trim().is_empty())
}

/// Inner content of a fragment made of exactly one paragraph.
fn unwrap_paragraph(fragment: &str) -> &str {
    SINGLE_PARAGRAPH_RE
        .captures(fragment)
        .and_then(|caps| caps.get(1))
        .map(|inner| inner.as_str())
        .filter(|inner| !inner.to_ascii_lowercase().contains("</p"))
        .map_or(fragment, str::trim)
}

/// Replace every transclusion directive with its snippet or a placeholder.
pub(crate) fn resolve_transclusions(html: &str, cx: &mut PassContext<'_>) -> String {
    let html = BLOCK_RE.replace_all(html, |caps: &Captures<'_>| {
        // Directives without a target are left for vendor element removal
        let Some(src) = directive_src(caps) else {
            return caps[0].to_owned();
        };
        if let Some(fragment) = cx.snippets.load(cx.anchor_path, src) {
            format!(r#"<div class="snippet-content">{fragment}</div>"#)
        } else {
            cx.record_missing(src);
            format!(r#"<div class="snippet-placeholder">📄 Snippet: {src}</div>"#)
        }
    });

    INLINE_RE
        .replace_all(&html, |caps: &Captures<'_>| {
            let Some(src) = directive_src(caps) else {
                return r#"<span class="snippet-text">📄 Snippet</span>"#.to_owned();
            };
            if let Some(fragment) = cx.snippets.load(cx.anchor_path, src) {
                unwrap_paragraph(&fragment).to_owned()
            } else {
                cx.record_missing(src);
                format!(r#"<span class="snippet-text">📄 {src}</span>"#)
            }
        })
        .into_owned()
}

/// Remove every transclusion directive without resolving it.
///
/// Returns the cleaned markup and the number of directives removed.
pub(crate) fn strip_directives(html: &str) -> (String, usize) {
    let blocks = BLOCK_RE.find_iter(html).count();
    let html = BLOCK_RE.replace_all(html, "");
    let inline = INLINE_RE.find_iter(&html).count();
    let html = INLINE_RE.replace_all(&html, "").into_owned();
    (html, blocks + inline)
}
