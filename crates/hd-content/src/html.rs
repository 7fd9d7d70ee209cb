//! Shared string-level HTML helpers.
//!
//! The pipeline never builds a parse tree; these helpers cover the handful of
//! lexical operations every pass needs.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static BODY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*?)</body\s*>").unwrap());

static BODY_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body\b[^>]*>").unwrap());

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static PRE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<pre\b[^>]*>(.*?)</pre\s*>").unwrap());

/// Inner content of the `<body>` element, if there is one.
///
/// A `<body>` without a closing tag yields everything after the opening tag.
pub(crate) fn extract_body(document: &str) -> Option<&str> {
    if let Some(caps) = BODY_RE.captures(document) {
        return caps.get(1).map(|m| m.as_str());
    }
    BODY_OPEN_RE.find(document).map(|m| &document[m.end()..])
}

/// Remove every tag, keeping text content.
pub(crate) fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Plain text of a markup fragment: tags stripped, entities decoded,
/// whitespace collapsed.
pub(crate) fn plain_text(html: &str) -> String {
    let stripped = strip_tags(html);
    let decoded = html_escape::decode_html_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Value of a quoted attribute inside a tag's attribute string.
///
/// Matches `name="value"` or `name='value'`, case-insensitively on the name.
pub(crate) fn attr_value<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    let lower = attrs.to_ascii_lowercase();
    let needle = name.to_ascii_lowercase();
    let mut from = 0;
    while let Some(offset) = lower[from..].find(&needle) {
        let start = from + offset;
        from = start + needle.len();

        // Must be a whole attribute name
        let preceded_ok = start == 0
            || lower[..start]
                .chars()
                .next_back()
                .is_some_and(char::is_whitespace);
        if !preceded_ok {
            continue;
        }

        let rest = attrs[from..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let value = &rest[1..];
        return value.find(quote).map(|end| &value[..end]);
    }
    None
}

/// Byte ranges of `<pre>` element interiors.
///
/// Whitespace passes leave these ranges untouched so code listings keep their
/// line structure.
pub(crate) fn preformatted_ranges(html: &str) -> Vec<Range<usize>> {
    PRE_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).map(|m| m.range()))
        .collect()
}

/// Surrounding text handed to [`rewrite`] callbacks.
pub(crate) struct Around<'h> {
    /// Everything before the match.
    pub before: &'h str,
    /// Everything after the match.
    pub after: &'h str,
}

/// Regex rewrite that can skip protected ranges and inspect neighbours.
///
/// For every match that does not overlap a `protected` range, `replace` is
/// called with the captures and the surrounding text. Returning `None` leaves
/// the match as it was.
pub(crate) fn rewrite<F>(html: &str, re: &Regex, protected: &[Range<usize>], mut replace: F) -> String
where
    F: FnMut(&Captures<'_>, &Around<'_>) -> Option<String>,
{
    let mut out = String::with_capacity(html.len());
    let mut last = 0;

    for caps in re.captures_iter(html) {
        let Some(whole) = caps.get(0) else { continue };
        if protected
            .iter()
            .any(|r| whole.start() < r.end && r.start < whole.end())
        {
            continue;
        }
        let around = Around {
            before: &html[..whole.start()],
            after: &html[whole.end()..],
        };
        let Some(replacement) = replace(&caps, &around) else {
            continue;
        };
        out.push_str(&html[last..whole.start()]);
        out.push_str(&replacement);
        last = whole.end();
    }

    if last == 0 {
        return html.to_owned();
    }
    out.push_str(&html[last..]);
    out
}

/// Apply a replacement repeatedly until the text stops changing.
///
/// Used by rules whose matches can overlap or nest (nested wrappers, chains of
/// line breaks). Every rule passed here strictly shrinks its input, so the loop
/// terminates.
pub(crate) fn until_stable(html: &str, mut step: impl FnMut(&str) -> String) -> String {
    let mut current = html.to_owned();
    loop {
        let next = step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}
