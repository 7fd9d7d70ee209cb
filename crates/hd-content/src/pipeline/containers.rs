//! Removal of empty paragraphs and divs.

use std::sync::LazyLock;

use regex::Regex;

use crate::html::{rewrite, strip_tags, until_stable};

/// A run of adjacent empty containers with the whitespace around them.
static EMPTY_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\s*<(?:p|div)\b[^>]*>\s*</(?:p|div)\s*>)+\s*").unwrap()
});

/// Delete paragraph and div elements with no content.
///
/// Each run of adjacent empty elements is replaced, together with its
/// surrounding whitespace, by the separator the block spacing pass would have
/// produced without it: nothing before a closing tag or at either end of the
/// text, a blank line when a line break was there, otherwise a single space.
/// Containers left empty by a removal are picked up by the next sweep, so the
/// number of sweeps follows the nesting depth, not the number of elements.
pub(crate) fn remove_empty_containers(html: &str) -> String {
    until_stable(html, sweep)
}

/// Remove every run of empty containers in one left-to-right scan.
fn sweep(html: &str) -> String {
    rewrite(html, &EMPTY_RUN_RE, &[], |caps, around| {
        let gap = strip_tags(&caps[0]);
        let separator = if around.before.is_empty()
            || around.after.is_empty()
            || around.after.starts_with("</")
        {
            ""
        } else if gap.contains('\n') {
            "\n\n"
        } else if gap.is_empty() {
            ""
        } else {
            " "
        };
        Some(separator.to_owned())
    })
}
