//! Repairs for malformed and legacy tag patterns.
//!
//! Each rule is independent of the others. Opening and closing tags of simple
//! renames are rewritten separately, so nesting is preserved.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::html::{attr_value, rewrite, until_stable};

static DANGLING_ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<>([^<]+)</></a>").unwrap());

static NAMED_ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\s+([^>]*?)\s*(?:/>|>\s*</a\s*>)").unwrap());

static EMPTY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<\s*/\s*>").unwrap());

static ITALIC_BOLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<b\s+style\s*=\s*"\s*font-style:\s*italic;?\s*"\s*>(.*?)</b\s*>"#).unwrap()
});

static BOLD_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<b\b[^>]*>").unwrap());
static BOLD_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</b\s*>").unwrap());
static ITALIC_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<i\b[^>]*>").unwrap());
static ITALIC_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</i\s*>").unwrap());
static UNDERLINE_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<u\b[^>]*>").unwrap());
static UNDERLINE_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</u\s*>").unwrap());

static STRAY_IMG_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</img\s*>").unwrap());

static VOID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(br|hr)\s*/?>").unwrap());

static IFRAME_SELF_CLOSING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<iframe\b([^>]*?)\s*/>").unwrap());

static IFRAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<iframe\b([^>]*?)\s*>.*?</iframe\s*>").unwrap());

const VIDEO_CONTAINER_OPEN: &str = r#"<div class="video-container">"#;

/// Apply every legacy-tag repair.
pub(crate) fn repair_legacy_tags(html: &str) -> String {
    let html = DANGLING_ANCHOR_RE.replace_all(html, r#"<span class="broken-link">$1</span>"#);
    let html = until_stable(&html, |h| EMPTY_TAG_RE.replace_all(h, "").into_owned());
    let html = named_anchors(&html);
    let html = ITALIC_BOLD_RE.replace_all(&html, "<em>$1</em>");
    let html = rename(&html, &BOLD_OPEN_RE, r#"<span class="bold-text">"#, &BOLD_CLOSE_RE, "</span>");
    let html = rename(&html, &ITALIC_OPEN_RE, "<em>", &ITALIC_CLOSE_RE, "</em>");
    let html = rename(
        &html,
        &UNDERLINE_OPEN_RE,
        r#"<span style="text-decoration: underline;">"#,
        &UNDERLINE_CLOSE_RE,
        "</span>",
    );
    let html = STRAY_IMG_CLOSE_RE.replace_all(&html, "");
    let html = VOID_RE.replace_all(&html, |caps: &Captures<'_>| {
        format!("<{} />", caps[1].to_ascii_lowercase())
    });
    wrap_iframes(&html)
}

/// Named anchors, empty or self-closing, become empty `anchor` spans carrying
/// the name as `id`.
fn named_anchors(html: &str) -> String {
    rewrite(html, &NAMED_ANCHOR_RE, &[], |caps, _| {
        let attrs = &caps[1];
        if attr_value(attrs, "href").is_some() {
            return None;
        }
        attr_value(attrs, "name")
            .map(|name| format!(r#"<span id="{name}" class="anchor"></span>"#))
    })
}

fn rename(html: &str, open: &Regex, open_to: &str, close: &Regex, close_to: &str) -> String {
    let html = open.replace_all(html, open_to);
    close.replace_all(&html, close_to).into_owned()
}

/// Wrap embedded frames in a `video-container` div, once.
fn wrap_iframes(html: &str) -> String {
    let html = IFRAME_SELF_CLOSING_RE.replace_all(html, "<iframe$1></iframe>");
    rewrite(&html, &IFRAME_RE, &[], |caps, around| {
        let frame = format!("<iframe{}></iframe>", &caps[1]);
        if around.before.trim_end().ends_with(VIDEO_CONTAINER_OPEN) {
            // Already wrapped: only normalize the element itself
            return (caps[0] != frame).then_some(frame);
        }
        Some(format!("{VIDEO_CONTAINER_OPEN}{frame}</div>"))
    })
}
