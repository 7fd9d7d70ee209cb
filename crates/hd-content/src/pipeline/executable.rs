//! Removal of `<script>` and `<style>` elements.

use std::sync::LazyLock;

use regex::Regex;

static SELF_CLOSING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:script|style)\b[^>]*/>").unwrap());

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());

static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());

/// Remove script and style elements, content included.
pub(crate) fn strip_executable(html: &str) -> String {
    let html = SELF_CLOSING_RE.replace_all(html, "");
    let html = SCRIPT_RE.replace_all(&html, "");
    STYLE_RE.replace_all(&html, "").into_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_strip_script() {
        let html = "<p>a</p><script type=\"text/javascript\">\nalert('x');\n</script><p>b</p>";
        assert_eq!(strip_executable(html), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_strip_style_case_insensitive() {
        let html = "<STYLE>p { color: red; }</STYLE><p>b</p>";
        assert_eq!(strip_executable(html), "<p>b</p>");
    }

    #[test]
    fn test_strip_self_closing_script() {
        let html = "<script src=\"x.js\" /><p>kept</p><script>y()</script>";
        assert_eq!(strip_executable(html), "<p>kept</p>");
    }

    #[test]
    fn test_strip_multiple_lazily() {
        let html = "<script>a</script><p>between</p><script>b</script>";
        assert_eq!(strip_executable(html), "<p>between</p>");
    }

    #[test]
    fn test_leaves_similar_tags() {
        let html = "<scripture>x</scripture>";
        assert_eq!(strip_executable(html), html);
    }
}
