//! Block spacing and line-break repair.
//!
//! Neither pass touches the interior of `<pre>` elements.

use std::sync::LazyLock;

use regex::Regex;

use crate::html::{preformatted_ranges, rewrite, until_stable};

static BLOCK_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)</(?:h[1-6]|p|div|ul|ol|li|dl|dt|dd|table|caption|thead|tbody|tfoot|tr|th|td|",
        r"blockquote|pre|form|fieldset|legend|article|section|aside|nav|header|",
        r"footer|main|details|summary|figure|figcaption|address)\s*>\s*",
    ))
    .unwrap()
});

static NEWLINE_PADDING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*\n[ \t]*").unwrap());

static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Inline content that may follow a collapsed line break.
const INLINE_START: &str = r"[\w(]|<(?:em|strong|b|i|span|a|img|code)\b";

static TEXT_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"([\w.,;:!?)])[ \t]*\n[ \t]*({INLINE_START})")).unwrap()
});

static ELEMENT_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(</(?:em|strong|b|i|span|a|code)>|<img\b[^>]*>)[ \t]*\n[ \t]*({INLINE_START})"
    ))
    .unwrap()
});

/// Apply a rewrite outside `<pre>` interiors.
fn rewrite_outside_pre(html: &str, re: &Regex, replacement: &str) -> String {
    let protected = preformatted_ranges(html);
    rewrite(html, re, &protected, |caps, _| {
        (&caps[0] != replacement).then(|| replacement.to_owned())
    })
}

/// Put one blank line after each block-closing tag and normalize whitespace.
///
/// A block that is the last child of its container (the next content is a
/// closing tag) gets no trailing whitespace at all.
pub(crate) fn space_blocks(html: &str) -> String {
    let protected = preformatted_ranges(html);
    let html = rewrite(html, &BLOCK_CLOSE_RE, &protected, |caps, around| {
        let close = caps[0].trim_end();
        let spacing = if around.after.starts_with("</") { "" } else { "\n\n" };
        Some(format!("{close}{spacing}"))
    });

    let html = rewrite_outside_pre(&html, &NEWLINE_PADDING_RE, "\n");
    let html = rewrite_outside_pre(&html, &SPACE_RUN_RE, " ");
    let html = rewrite_outside_pre(&html, &BLANK_LINES_RE, "\n\n");
    html.trim().to_owned()
}

/// Join single line breaks that split a run of inline content.
///
/// Blank lines between blocks are left alone.
pub(crate) fn collapse_line_breaks(html: &str) -> String {
    until_stable(html, |current| {
        let protected = preformatted_ranges(current);
        let joined = rewrite(current, &TEXT_BREAK_RE, &protected, |caps, _| {
            Some(format!("{} {}", &caps[1], &caps[2]))
        });
        let protected = preformatted_ranges(&joined);
        rewrite(&joined, &ELEMENT_BREAK_RE, &protected, |caps, _| {
            Some(format!("{} {}", &caps[1], &caps[2]))
        })
    })
}
