//! Snippet loading for transclusion.
//!
//! A snippet is a reusable fragment file inlined into topics by
//! `<MadCap:snippetBlock>` and `<MadCap:snippetText>` directives. The loader
//! reads the file, extracts its body and applies a reduced cleanup: the
//! fragment arrives in the middle of the main pipeline, after the passes that
//! handle scripts, cross-references and transclusion have already run on the
//! surrounding topic.
//!
//! Transclusion is one level deep. Directives inside a snippet are removed
//! rather than resolved.

use hd_storage::Storage;

use crate::html::extract_body;
use crate::path::{is_absolute, normalize_site_path, resolve};
use crate::pipeline::{attributes, executable, images, transclusion, vendor};

/// Storage location of a snippet reference.
///
/// Relative references resolve against `anchor_path`; the result is a collapsed
/// site path. External references (with a URI scheme) are returned as written.
#[must_use]
pub fn snippet_path(anchor_path: &str, reference: &str) -> String {
    let resolved = resolve(anchor_path, reference);
    if is_absolute(&resolved) && !resolved.starts_with('/') {
        return resolved;
    }
    normalize_site_path(&resolved)
}

/// Reads and cleans snippet fragments from storage.
#[derive(Clone, Copy)]
pub struct SnippetLoader<'s> {
    storage: &'s dyn Storage,
}

impl<'s> SnippetLoader<'s> {
    /// Create a loader reading from `storage`.
    #[must_use]
    pub fn new(storage: &'s dyn Storage) -> Self {
        Self { storage }
    }

    /// Load a snippet referenced from the document at `anchor_path`.
    ///
    /// Returns the cleaned fragment, or `None` if the snippet cannot be read.
    /// A missing snippet is logged and never fails the caller.
    #[must_use]
    pub fn load(&self, anchor_path: &str, snippet_ref: &str) -> Option<String> {
        let path = snippet_path(anchor_path, snippet_ref);
        if !path.starts_with('/') {
            tracing::warn!(src = %snippet_ref, "Snippet reference is not a site path");
            return None;
        }

        let document = match self.storage.read(&path) {
            Ok(document) => document,
            Err(e) if e.is_not_found() => {
                tracing::warn!(path = %path, anchor = %anchor_path, "Snippet not found");
                return None;
            }
            Err(e) => {
                tracing::error!(path = %path, error = %e, "Failed to read snippet");
                return None;
            }
        };

        let fragment = extract_body(&document).unwrap_or(&document);
        Some(clean_fragment(fragment, &path))
    }
}

/// Reduced cleanup applied to a snippet fragment.
///
/// Image references are resolved against the snippet's own path, not the
/// topic that includes it.
fn clean_fragment(fragment: &str, snippet_path: &str) -> String {
    let html = executable::strip_executable(fragment);
    let html = vendor::resolve_cross_references(&html);

    let (html, nested) = transclusion::strip_directives(&html);
    if nested > 0 {
        tracing::debug!(
            path = %snippet_path,
            count = nested,
            "Dropped nested snippet directives"
        );
    }

    let html = attributes::strip_vendor_attributes(&html);
    let html = attributes::strip_classes(&html);
    let html = images::resolve_image_paths(&html, snippet_path);
    html.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use hd_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_snippet_path_relative() {
        assert_eq!(
            snippet_path("/en/Content/A/B.htm", "../Resources/Snippets/Foo.flsnp"),
            "/en/Content/Resources/Snippets/Foo.flsnp"
        );
    }

    #[test]
    fn test_snippet_path_collapses_rooted() {
        assert_eq!(
            snippet_path("/en/Content/A.htm", "/en/Resources/../Snippets/X.htm"),
            "/en/Snippets/X.htm"
        );
    }

    #[test]
    fn test_snippet_path_external() {
        assert_eq!(
            snippet_path("/en/A.htm", "https://example.com/s.htm"),
            "https://example.com/s.htm"
        );
    }

    #[test]
    fn test_load_extracts_body() {
        let storage = MockStorage::new().with_file(
            "/en/Resources/Snippets/Note.flsnp",
            "<?xml version=\"1.0\"?><html><body><p>Shared text</p></body></html>",
        );
        let loader = SnippetLoader::new(&storage);

        let fragment = loader.load("/en/Content/Topic.htm", "../Resources/Snippets/Note.flsnp");
        assert_eq!(fragment.as_deref(), Some("<p>Shared text</p>"));
    }

    #[test]
    fn test_load_without_body_uses_whole_file() {
        let storage = MockStorage::new().with_file("/en/Snippets/Plain.htm", "\n<p>Plain</p>\n");
        let loader = SnippetLoader::new(&storage);

        let fragment = loader.load("/en/Topic.htm", "Snippets/Plain.htm");
        assert_eq!(fragment.as_deref(), Some("<p>Plain</p>"));
    }

    #[test]
    fn test_load_missing_returns_none() {
        let storage = MockStorage::new();
        let loader = SnippetLoader::new(&storage);

        assert_eq!(loader.load("/en/Topic.htm", "Missing.htm"), None);
    }

    #[test]
    fn test_load_unreadable_returns_none() {
        let storage = MockStorage::new()
            .with_file("/en/Locked.htm", "<p>x</p>")
            .with_unreadable("/en/Locked.htm");
        let loader = SnippetLoader::new(&storage);

        assert_eq!(loader.load("/en/Topic.htm", "Locked.htm"), None);
    }

    #[test]
    fn test_load_external_returns_none() {
        let storage = MockStorage::new();
        let loader = SnippetLoader::new(&storage);

        assert_eq!(loader.load("/en/Topic.htm", "https://example.com/s.htm"), None);
    }

    #[test]
    fn test_images_resolve_against_snippet() {
        let storage = MockStorage::new().with_file(
            "/en/Resources/Snippets/Logo.flsnp",
            r#"<body><p><img src="../Images/logo.png" /></p></body>"#,
        );
        let loader = SnippetLoader::new(&storage);

        let fragment = loader
            .load("/en/Content/Deep/Topic.htm", "../../Resources/Snippets/Logo.flsnp")
            .unwrap();
        assert_eq!(
            fragment,
            r#"<p><img src="/en/Resources/Images/logo.png" /></p>"#
        );
    }

    #[test]
    fn test_reduced_cleanup() {
        let storage = MockStorage::new().with_file(
            "/en/S.htm",
            concat!(
                r#"<body><script>x()</script>"#,
                r#"<p class="Note" MadCap:autonum="1" data-mc-conditions="A">"#,
                r#"See <MadCap:xref href="B.htm">B</MadCap:xref></p></body>"#,
            ),
        );
        let loader = SnippetLoader::new(&storage);

        let fragment = loader.load("/en/T.htm", "S.htm").unwrap();
        assert_eq!(
            fragment,
            r#"<p>See <a href="B.htm" class="internal-link">B</a></p>"#
        );
    }

    #[test]
    fn test_nested_directives_removed() {
        let storage = MockStorage::new()
            .with_file(
                "/en/Outer.htm",
                r#"<body><p>outer</p><MadCap:snippetBlock src="Inner.htm" /></body>"#,
            )
            .with_file("/en/Inner.htm", "<body><p>inner</p></body>");
        let loader = SnippetLoader::new(&storage);

        let fragment = loader.load("/en/T.htm", "Outer.htm").unwrap();
        assert_eq!(fragment, "<p>outer</p>");
    }
}
