//! Code block language detection.
//!
//! Exported topics rarely label their code listings, so the language class is
//! guessed from the listing text. Detection is a table of `(predicate, tag)`
//! rules evaluated top to bottom; the first matching rule wins and unmatched
//! text falls back to [`DEFAULT_LANGUAGE`].

/// Tag used when no rule matches.
pub const DEFAULT_LANGUAGE: &str = "text";

/// A single detection rule.
#[derive(Clone, Copy)]
pub struct LanguageRule {
    /// Language tag emitted as `language-{tag}`.
    pub tag: &'static str,
    /// Predicate over the trimmed, entity-decoded listing text.
    pub matches: fn(&str) -> bool,
}

/// Detection rules in priority order.
pub const LANGUAGE_RULES: &[LanguageRule] = &[
    LanguageRule {
        tag: "javascript",
        matches: is_javascript,
    },
    LanguageRule {
        tag: "json",
        matches: is_json,
    },
    LanguageRule {
        tag: "html",
        matches: is_html,
    },
    LanguageRule {
        tag: "css",
        matches: is_css,
    },
    LanguageRule {
        tag: "bash",
        matches: is_bash,
    },
    LanguageRule {
        tag: "sql",
        matches: is_sql,
    },
    LanguageRule {
        tag: "python",
        matches: is_python,
    },
];

fn is_javascript(code: &str) -> bool {
    ["function", "const ", "let ", "var "]
        .iter()
        .any(|needle| code.contains(needle))
}

fn is_json(code: &str) -> bool {
    code.starts_with('{') && code.ends_with('}')
}

fn is_html(code: &str) -> bool {
    code.contains('<') && code.contains('>')
}

fn is_css(code: &str) -> bool {
    code.contains('{') && code.contains('}') && code.contains(':')
}

fn is_bash(code: &str) -> bool {
    code.starts_with('$')
        || code.starts_with('#')
        || code.contains("curl ")
        || code.contains("npm ")
}

fn is_sql(code: &str) -> bool {
    let lower = code.to_lowercase();
    ["select ", "from ", "where "]
        .iter()
        .any(|needle| lower.contains(needle))
}

fn is_python(code: &str) -> bool {
    ["def ", "import ", "print("]
        .iter()
        .any(|needle| code.contains(needle))
}

/// Guess the language tag of a code listing.
///
/// `code` is the listing's text content (markup already stripped); entities
/// are decoded here so `&lt;div&gt;` is recognized as HTML.
///
/// # Examples
///
/// ```
/// use hd_content::detect_language;
///
/// assert_eq!(detect_language("const x = 1;"), "javascript");
/// assert_eq!(detect_language("&lt;div&gt;hi&lt;/div&gt;"), "html");
/// assert_eq!(detect_language("hello"), "text");
/// ```
#[must_use]
pub fn detect_language(code: &str) -> &'static str {
    let decoded = html_escape::decode_html_entities(code);
    let text = decoded.trim();
    LANGUAGE_RULES
        .iter()
        .find(|rule| (rule.matches)(text))
        .map_or(DEFAULT_LANGUAGE, |rule| rule.tag)
}
