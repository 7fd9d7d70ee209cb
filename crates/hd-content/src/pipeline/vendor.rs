//! Authoring-tool elements: cross-references, conditional text, leftovers.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::html::{attr_value, until_stable};

static XREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<MadCap:xref\b([^>]*)>(.*?)</MadCap:xref\s*>").unwrap()
});

static CONDITIONAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<MadCap:conditionalText\b[^>]*>(.*?)</MadCap:conditionalText\s*>").unwrap()
});

static SELF_CLOSING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<MadCap:[\w.-]+\b[^>]*/>").unwrap());

static PAIRED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<MadCap:[\w.-]+\b[^>]*>.*?</MadCap:[\w.-]+\s*>").unwrap()
});

static ORPHAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?MadCap:[^>]*>").unwrap());

/// Rewrite cross-reference elements into plain hyperlinks.
///
/// A cross-reference without a target keeps its text inside a `broken-link`
/// span.
pub(crate) fn resolve_cross_references(html: &str) -> String {
    XREF_RE
        .replace_all(html, |caps: &Captures<'_>| {
            let text = &caps[2];
            match attr_value(&caps[1], "href").filter(|href| !href.is_empty()) {
                Some(href) => format!(r#"<a href="{href}" class="internal-link">{text}</a>"#),
                None => format!(r#"<span class="broken-link">{text}</span>"#),
            }
        })
        .into_owned()
}

/// Unwrap conditional text and delete every other vendor element.
///
/// Conditions are not evaluated: all conditional content is visible. Nested
/// conditional wrappers are unwrapped from the outside in until none remain.
pub(crate) fn resolve_vendor_elements(html: &str) -> String {
    let html = until_stable(html, |current| {
        CONDITIONAL_RE.replace_all(current, "$1").into_owned()
    });
    let html = SELF_CLOSING_RE.replace_all(&html, "");
    let html = PAIRED_RE.replace_all(&html, "");
    ORPHAN_RE.replace_all(&html, "").into_owned()
}
