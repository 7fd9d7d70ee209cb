//! Attribute stripping: vendor attributes and authoring-tool classes.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Classes the pipeline adds itself and must survive class stripping.
pub(crate) const MARKER_CLASSES: &[&str] = &[
    "internal-link",
    "broken-link",
    "snippet-content",
    "snippet-placeholder",
    "snippet-text",
    "anchor",
    "bold-text",
    "code-block",
    "inline-code",
    "video-container",
];

static START_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Za-z][^<>]*>").unwrap());

/// One attribute inside a start tag: name, then an optional double-quoted,
/// single-quoted or unquoted value.
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s+([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'<>]+)))?"#).unwrap()
});

/// Attribute name prefixes written by the authoring tool.
const VENDOR_PREFIXES: &[&str] = &["madcap:", "xmlns:", "data-mc-"];

/// Whether a class attribute value was produced by the pipeline.
///
/// Only the first class token is checked; marker classes are always emitted
/// first.
pub(crate) fn is_marker_class(value: &str) -> bool {
    value.split_whitespace().next().is_some_and(|first| {
        MARKER_CLASSES.contains(&first) || first.starts_with("language-")
    })
}

fn is_vendor_attribute(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    VENDOR_PREFIXES
        .iter()
        .any(|prefix| lower.len() > prefix.len() && lower.starts_with(prefix))
}

/// Drop the attributes of every start tag for which `keep(name, value)` is
/// false.
///
/// Attributes are matched left to right, so text inside a quoted value is never
/// mistaken for an attribute.
fn retain_attributes(html: &str, keep: impl Fn(&str, &str) -> bool) -> String {
    START_TAG_RE
        .replace_all(html, |tag: &Captures<'_>| {
            let tag = &tag[0];
            let name_end = tag[1..]
                .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
                .map_or(tag.len(), |i| i + 1);
            let (name, attrs) = tag.split_at(name_end);
            let attrs = ATTR_RE.replace_all(attrs, |attr: &Captures<'_>| {
                let value = attr
                    .get(2)
                    .or_else(|| attr.get(3))
                    .or_else(|| attr.get(4))
                    .map_or("", |m| m.as_str());
                if keep(&attr[1], value) {
                    attr[0].to_owned()
                } else {
                    String::new()
                }
            });
            format!("{name}{attrs}")
        })
        .into_owned()
}

/// Remove vendor-namespace, `xmlns:` and `data-mc-` attributes, whatever
/// their value syntax.
pub(crate) fn strip_vendor_attributes(html: &str) -> String {
    retain_attributes(html, |name, _| !is_vendor_attribute(name))
}

/// Remove every `class` attribute that is not a pipeline marker.
pub(crate) fn strip_classes(html: &str) -> String {
    retain_attributes(html, |name, value| {
        !name.eq_ignore_ascii_case("class") || is_marker_class(value)
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_strip_vendor_attributes() {
        let html = r#"<p MadCap:conditions="Default.Print" data-mc-autonum="Note: " id="x">Text</p>"#;
        assert_eq!(strip_vendor_attributes(html), r#"<p id="x">Text</p>"#);
    }

    #[test]
    fn test_strip_xmlns_prefixed() {
        let html = r#"<html xmlns:MadCap="http://www.madcapsoftware.com/Schemas/MadCap.xsd" lang="en">"#;
        assert_eq!(strip_vendor_attributes(html), r#"<html lang="en">"#);
    }

    #[test]
    fn test_vendor_attributes_single_quotes() {
        let html = "<span data-mc-target='x'>a</span>";
        assert_eq!(strip_vendor_attributes(html), "<span>a</span>");
    }

    #[test]
    fn test_vendor_attribute_text_untouched() {
        let html = r#"<p>Set data-mc-x="1" in text</p>"#;
        assert_eq!(strip_vendor_attributes(html), html);
    }

    #[test]
    fn test_strip_authoring_classes() {
        let html = r#"<p class="Note">a</p><td class='TableStyle-Basic'>b</td>"#;
        assert_eq!(strip_classes(html), "<p>a</p><td>b</td>");
    }

    #[test]
    fn test_keep_marker_classes() {
        let html = concat!(
            r#"<a href="A.htm" class="internal-link">A</a>"#,
            r#"<div class="code-block syntax-highlighted"><pre><code class="language-json">{}</code></pre></div>"#,
            r#"<span class="bold-text">b</span>"#,
        );
        assert_eq!(strip_classes(html), html);
    }

    #[test]
    fn test_marker_must_come_first() {
        let html = r#"<p class="Note snippet-content">a</p>"#;
        assert_eq!(strip_classes(html), "<p>a</p>");
    }

    #[test]
    fn test_similar_attribute_names_kept() {
        let html = r#"<div data-class="x" class="y">a</div>"#;
        assert_eq!(strip_classes(html), r#"<div data-class="x">a</div>"#);
    }

    #[test]
    fn test_is_marker_class() {
        assert!(is_marker_class("anchor"));
        assert!(is_marker_class("language-python"));
        assert!(!is_marker_class(""));
        assert!(!is_marker_class("mc-heading"));
    }

    #[test]
    fn test_strip_unquoted_and_valueless_vendor_attributes() {
        assert_eq!(
            strip_vendor_attributes("<p MadCap:conditions=Print>x</p>"),
            "<p>x</p>"
        );
        assert_eq!(strip_vendor_attributes("<p data-mc-x>x</p>"), "<p>x</p>");
        assert_eq!(
            strip_vendor_attributes("<td data-mc-conditions id=c1 MADCAP:autonum=1.>x</td>"),
            "<td id=c1>x</td>"
        );
    }

    #[test]
    fn test_vendor_name_inside_quoted_value_kept() {
        let html = r#"<p title="see data-mc-x and MadCap:y" data-mc-z>x</p>"#;
        assert_eq!(
            strip_vendor_attributes(html),
            r#"<p title="see data-mc-x and MadCap:y">x</p>"#
        );
    }

    #[test]
    fn test_self_closing_tag_keeps_slash() {
        assert_eq!(
            strip_vendor_attributes(r#"<img src="a.png" MadCap:mediastyle="x" />"#),
            r#"<img src="a.png" />"#
        );
    }

    #[test]
    fn test_strip_unquoted_class() {
        assert_eq!(strip_classes("<p class=Note id=a>x</p>"), "<p id=a>x</p>");
        assert_eq!(
            strip_classes("<span class=bold-text>x</span>"),
            "<span class=bold-text>x</span>"
        );
    }
}
