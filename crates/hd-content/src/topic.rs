//! Topic loading.
//!
//! Reads a topic file from storage, extracts its title and body, and runs the
//! body through the [`Pipeline`].

use std::sync::{Arc, LazyLock};

use hd_storage::Storage;
use regex::Regex;

use crate::html::{extract_body, plain_text};
use crate::path::normalize_site_path;
use crate::pipeline::{LoadReport, Pipeline};

/// Title used when a topic has neither `<title>` nor `<h1>`.
pub const UNTITLED: &str = "Untitled";

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title\b[^>]*>(.*?)</title\s*>").unwrap());

static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1\s*>").unwrap());

/// A normalized topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTopic {
    /// Topic title, never empty.
    pub title: String,
    /// Normalized body markup.
    pub body_html: String,
    /// Site path the topic was loaded from.
    pub source_path: String,
}

/// Serialized as `{ title, content, body, sourcePath }`, where `content` and
/// `body` both carry the normalized markup.
#[cfg(feature = "serde")]
impl serde::Serialize for ParsedTopic {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("ParsedTopic", 4)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("content", &self.body_html)?;
        state.serialize_field("body", &self.body_html)?;
        state.serialize_field("sourcePath", &self.source_path)?;
        state.end()
    }
}

/// Extract a topic title from a full document.
///
/// Uses the first of `<title>` (single line) and `<h1>` with non-empty text,
/// falling back to [`UNTITLED`].
#[must_use]
pub fn extract_title(document: &str) -> String {
    [&*TITLE_RE, &*H1_RE]
        .into_iter()
        .filter_map(|re| re.captures(document))
        .map(|caps| plain_text(&caps[1]))
        .find(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED.to_owned())
}

/// Loads topics from storage and normalizes them.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use hd_content::TopicLoader;
/// use hd_storage::MockStorage;
///
/// let storage = MockStorage::new().with_file(
///     "/en/Content/Welcome.htm",
///     "<html><head><title>Welcome</title></head><body><p>Hi</p></body></html>",
/// );
/// let loader = TopicLoader::new(Arc::new(storage));
///
/// let topic = loader.load("en/Content/Welcome.htm").unwrap();
/// assert_eq!(topic.title, "Welcome");
/// assert_eq!(topic.body_html, "<p>Hi</p>");
/// assert_eq!(topic.source_path, "/en/Content/Welcome.htm");
/// ```
#[derive(Clone)]
pub struct TopicLoader {
    storage: Arc<dyn Storage>,
}

impl TopicLoader {
    /// Create a loader over `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Load and normalize a topic.
    ///
    /// `reference` is a site path with or without the leading `/`. Returns
    /// `None` when the topic does not exist or cannot be read.
    #[must_use]
    pub fn load(&self, reference: &str) -> Option<ParsedTopic> {
        self.load_with_report(reference).map(|(topic, _)| topic)
    }

    /// Load a topic and report snippets that could not be resolved.
    #[must_use]
    pub fn load_with_report(&self, reference: &str) -> Option<(ParsedTopic, LoadReport)> {
        let source_path = normalize_site_path(reference);

        let document = match self.storage.read(&source_path) {
            Ok(document) => document,
            Err(e) if e.is_not_found() => {
                tracing::warn!(path = %source_path, "Topic not found");
                return None;
            }
            Err(e) => {
                tracing::error!(path = %source_path, error = %e, "Failed to read topic");
                return None;
            }
        };

        let title = extract_title(&document);
        let body = extract_body(&document).unwrap_or(&document);
        let (body_html, report) =
            Pipeline::new(self.storage.as_ref()).normalize_with_report(body, &source_path);

        tracing::debug!(path = %source_path, title = %title, "Loaded topic");
        Some((
            ParsedTopic {
                title,
                body_html,
                source_path,
            },
            report,
        ))
    }
}

#[cfg(test)]
mod tests {
    use hd_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;

    fn loader(storage: MockStorage) -> TopicLoader {
        TopicLoader::new(Arc::new(storage))
    }

    #[test]
    fn test_title_from_title_element() {
        let doc = "<html><head><title>My Topic</title></head><body><h1>Heading</h1></body></html>";
        assert_eq!(extract_title(doc), "My Topic");
    }

    #[test]
    fn test_title_falls_back_to_h1() {
        let doc = "<html><body><h1 class=\"x\">Fallback</h1></body></html>";
        assert_eq!(extract_title(doc), "Fallback");
    }

    #[test]
    fn test_title_untitled() {
        assert_eq!(extract_title("<html><body><p>x</p></body></html>"), UNTITLED);
    }

    #[test]
    fn test_title_strips_tags_and_entities() {
        let doc = "<h1>\n  <span>Tips</span> &amp; <b>Tricks</b>\n</h1>";
        assert_eq!(extract_title(doc), "Tips & Tricks");
    }

    #[test]
    fn test_empty_title_uses_h1() {
        let doc = "<title> </title><h1>Real</h1>";
        assert_eq!(extract_title(doc), "Real");
    }

    #[test]
    fn test_load_topic() {
        let storage = MockStorage::new().with_file(
            "/en/Content/A/B.htm",
            concat!(
                "<html><head><title>Install</title><style>p{}</style></head>",
                "<body>\n<h1>Install</h1>\n<p class=\"Body\">Step <b>one</b></p>\n",
                "<p><img src=\"../images/x.png\" /></p>\n</body></html>"
            ),
        );

        let topic = loader(storage).load("/en/Content/A/B.htm").unwrap();
        assert_eq!(topic.title, "Install");
        assert_eq!(
            topic.body_html,
            concat!(
                "<h1>Install</h1>\n\n",
                "<p>Step <span class=\"bold-text\">one</span></p>\n\n",
                "<p><img src=\"/en/Content/images/x.png\" /></p>"
            )
        );
        assert_eq!(topic.source_path, "/en/Content/A/B.htm");
    }

    #[test]
    fn test_load_without_body_uses_whole_file() {
        let storage = MockStorage::new().with_file("/en/Frag.htm", "<h1>Frag</h1><p>x</p>");

        let topic = loader(storage).load("en/Frag.htm").unwrap();
        assert_eq!(topic.title, "Frag");
        assert_eq!(topic.body_html, "<h1>Frag</h1>\n\n<p>x</p>");
    }

    #[test]
    fn test_load_missing() {
        assert_eq!(loader(MockStorage::new()).load("/en/Missing.htm"), None);
    }

    #[test]
    fn test_load_unreadable() {
        let storage = MockStorage::new()
            .with_file("/en/Locked.htm", "<p>x</p>")
            .with_unreadable("/en/Locked.htm");
        assert_eq!(loader(storage).load("/en/Locked.htm"), None);
    }

    #[test]
    fn test_load_normalizes_reference() {
        let storage = MockStorage::new().with_file("/en/Content/A.htm", "<p>x</p>");

        let topic = loader(storage).load("en/Content/Other/../A.htm").unwrap();
        assert_eq!(topic.source_path, "/en/Content/A.htm");
    }

    #[test]
    fn test_load_with_report() {
        let storage = MockStorage::new().with_file(
            "/en/Content/A.htm",
            r#"<body><MadCap:snippetText src="../Resources/Name.flsnp" /></body>"#,
        );

        let (topic, report) = loader(storage).load_with_report("/en/Content/A.htm").unwrap();
        assert_eq!(topic.title, UNTITLED);
        assert_eq!(
            topic.body_html,
            r#"<span class="snippet-text">📄 ../Resources/Name.flsnp</span>"#
        );
        assert_eq!(report.missing_snippets[0].resolved_path, "/en/Resources/Name.flsnp");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_shape() {
        let topic = ParsedTopic {
            title: "T".to_owned(),
            body_html: "<p>x</p>".to_owned(),
            source_path: "/en/T.htm".to_owned(),
        };
        let value = serde_json::to_value(&topic).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "title": "T",
                "content": "<p>x</p>",
                "body": "<p>x</p>",
                "sourcePath": "/en/T.htm",
            })
        );
    }
}
