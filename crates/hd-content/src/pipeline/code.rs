//! Code block enhancement.
//!
//! Wraps `<pre><code>` listings for the site's highlighter and labels them with
//! a detected language. Bare inline `<code>` gets the inline marker class.

use std::sync::LazyLock;

use regex::Regex;

use crate::code_language::{DEFAULT_LANGUAGE, detect_language};
use crate::html::{attr_value, rewrite, strip_tags};

const CODE_BLOCK_OPEN: &str = r#"<div class="code-block syntax-highlighted">"#;
const INLINE_CODE_CLASS: &str = "inline-code syntax-highlighted";

static CODE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<pre\b([^>]*)>\s*<code\b([^>]*)>(.*?)</code\s*>\s*</pre\s*>").unwrap()
});

static INLINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<code\b([^>]*)>").unwrap());

static CLASS_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+class\s*=\s*(?:"[^"]*"|'[^']*')"#).unwrap()
});

/// Language already assigned to a `<code>` element, ignoring the default.
fn existing_language(code_attrs: &str) -> Option<&str> {
    attr_value(code_attrs, "class")?
        .split_whitespace()
        .find_map(|class| class.strip_prefix("language-"))
        .filter(|language| !language.is_empty() && *language != DEFAULT_LANGUAGE)
}

/// Wrap and label every `<pre><code>` block, then mark inline code.
pub(crate) fn enhance_code_blocks(html: &str) -> String {
    let html = rewrite(html, &CODE_BLOCK_RE, &[], |caps, around| {
        let (pre_attrs, code_attrs, code) = (&caps[1], &caps[2], &caps[3]);
        let language = existing_language(code_attrs)
            .unwrap_or_else(|| detect_language(&strip_tags(code)))
            .to_owned();
        let other_attrs = CLASS_ATTR_RE.replace_all(code_attrs, "");
        let block = format!(
            r#"<pre{pre_attrs}><code class="language-{language}"{other_attrs}>{code}</code></pre>"#
        );

        if around.before.trim_end().ends_with(CODE_BLOCK_OPEN) {
            return (caps[0] != block).then_some(block);
        }
        Some(format!("{CODE_BLOCK_OPEN}{block}</div>"))
    });

    rewrite(&html, &INLINE_CODE_RE, &[], |caps, _| {
        let attrs = &caps[1];
        if attr_value(attrs, "class").is_some() {
            return None;
        }
        Some(format!(r#"<code class="{INLINE_CODE_CLASS}"{attrs}>"#))
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_code_block_wrapped_with_language() {
        let html = "<pre><code>const x = 1;\nconsole.log(x);</code></pre>";
        assert_eq!(
            enhance_code_blocks(html),
            concat!(
                r#"<div class="code-block syntax-highlighted"><pre>"#,
                r#"<code class="language-javascript">const x = 1;"#,
                "\nconsole.log(x);</code></pre></div>"
            )
        );
    }

    #[test]
    fn test_existing_language_kept() {
        let html = r#"<pre><code class="language-rust">fn main() {}</code></pre>"#;
        assert_eq!(
            enhance_code_blocks(html),
            concat!(
                r#"<div class="code-block syntax-highlighted"><pre>"#,
                r#"<code class="language-rust">fn main() {}</code></pre></div>"#
            )
        );
    }

    #[test]
    fn test_text_language_redetected() {
        let html = r#"<pre><code class="language-text">SELECT 1 FROM t</code></pre>"#;
        assert!(enhance_code_blocks(html).contains(r#"<code class="language-sql">"#));
    }

    #[test]
    fn test_detection_ignores_markup() {
        let html = "<pre><code><span>$ npm install</span></code></pre>";
        assert!(enhance_code_blocks(html).contains(r#"<code class="language-bash">"#));
    }

    #[test]
    fn test_plain_listing_is_text() {
        let html = "<pre><code>just words</code></pre>";
        assert!(enhance_code_blocks(html).contains(r#"<code class="language-text">"#));
    }

    #[test]
    fn test_code_block_is_stable() {
        let once = enhance_code_blocks("<pre><code>def f():\n    pass</code></pre>");
        assert_eq!(enhance_code_blocks(&once), once);
    }

    #[test]
    fn test_inline_code_marked() {
        assert_eq!(
            enhance_code_blocks("Run <code>make</code> now"),
            r#"Run <code class="inline-code syntax-highlighted">make</code> now"#
        );
    }

    #[test]
    fn test_pre_without_code_untouched() {
        let html = "<pre>raw\n  text</pre>";
        assert_eq!(enhance_code_blocks(html), html);
    }
}
