//! Markup transform pipeline.
//!
//! Turns the body of an exported topic into clean HTML. The pipeline is a fixed
//! sequence of string-to-string passes; see [`Pass::ORDER`]. The passes do not
//! commute: cross-references must become links before vendor elements are
//! deleted, snippets must be inlined before their attributes are stripped, and
//! line breaks can only be repaired after block spacing has introduced them.
//!
//! No pass fails. Markup a rule does not recognize is left as it is.
//!
//! # Example
//!
//! ```
//! use hd_content::Pipeline;
//! use hd_storage::MockStorage;
//!
//! let storage = MockStorage::new();
//! let html = Pipeline::new(&storage).normalize(
//!     "<p class=\"Body\">Hello\n<b>world</b></p>",
//!     "/en/Content/Welcome.htm",
//! );
//! assert_eq!(html, r#"<p>Hello <span class="bold-text">world</span></p>"#);
//! ```

pub(crate) mod attributes;
mod code;
mod containers;
pub(crate) mod executable;
pub(crate) mod images;
mod legacy;
pub(crate) mod transclusion;
pub(crate) mod vendor;
mod whitespace;

use std::fmt;

use crate::snippet::{SnippetLoader, snippet_path};

/// A snippet reference that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MissingSnippet {
    /// The `src` value as written in the directive.
    pub reference: String,
    /// Storage path the reference resolved to.
    pub resolved_path: String,
}

/// Diagnostics collected while normalizing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LoadReport {
    /// Transclusion targets replaced by a placeholder, in document order.
    pub missing_snippets: Vec<MissingSnippet>,
}

impl LoadReport {
    /// Whether nothing went wrong.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.missing_snippets.is_empty()
    }
}

/// State shared by the passes of one pipeline run.
pub(crate) struct PassContext<'a> {
    /// Path of the document being normalized.
    pub anchor_path: &'a str,
    pub snippets: &'a SnippetLoader<'a>,
    report: LoadReport,
}

impl<'a> PassContext<'a> {
    pub(crate) fn new(anchor_path: &'a str, snippets: &'a SnippetLoader<'a>) -> Self {
        Self {
            anchor_path,
            snippets,
            report: LoadReport::default(),
        }
    }

    pub(crate) fn record_missing(&mut self, reference: &str) {
        self.report.missing_snippets.push(MissingSnippet {
            reference: reference.to_owned(),
            resolved_path: snippet_path(self.anchor_path, reference),
        });
    }

    pub(crate) fn into_report(self) -> LoadReport {
        self.report
    }
}

/// One step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    /// Remove `<script>` and `<style>` elements.
    StripExecutable,
    /// Rewrite cross-reference elements into `internal-link` anchors.
    CrossReferences,
    /// Inline block and text snippets.
    Transclusion,
    /// Unwrap conditional text, delete remaining vendor elements.
    VendorElements,
    /// Remove vendor, `xmlns:` and `data-mc-` attributes.
    VendorAttributes,
    /// Remove authoring-tool classes, keep pipeline markers.
    Classes,
    /// Repair malformed and legacy tags, wrap embedded video.
    LegacyTags,
    /// Resolve relative image sources.
    Images,
    /// Wrap and label code listings.
    CodeBlocks,
    /// Blank line after block closers, whitespace normalization.
    BlockSpacing,
    /// Join line breaks inside inline runs.
    LineBreaks,
    /// Delete empty paragraphs and divs.
    EmptyContainers,
}

impl Pass {
    /// Execution order.
    pub const ORDER: [Pass; 12] = [
        Pass::StripExecutable,
        Pass::CrossReferences,
        Pass::Transclusion,
        Pass::VendorElements,
        Pass::VendorAttributes,
        Pass::Classes,
        Pass::LegacyTags,
        Pass::Images,
        Pass::CodeBlocks,
        Pass::BlockSpacing,
        Pass::LineBreaks,
        Pass::EmptyContainers,
    ];

    /// Short name used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Pass::StripExecutable => "strip-executable",
            Pass::CrossReferences => "cross-references",
            Pass::Transclusion => "transclusion",
            Pass::VendorElements => "vendor-elements",
            Pass::VendorAttributes => "vendor-attributes",
            Pass::Classes => "classes",
            Pass::LegacyTags => "legacy-tags",
            Pass::Images => "images",
            Pass::CodeBlocks => "code-blocks",
            Pass::BlockSpacing => "block-spacing",
            Pass::LineBreaks => "line-breaks",
            Pass::EmptyContainers => "empty-containers",
        }
    }

    fn apply(self, html: &str, cx: &mut PassContext<'_>) -> String {
        match self {
            Pass::StripExecutable => executable::strip_executable(html),
            Pass::CrossReferences => vendor::resolve_cross_references(html),
            Pass::Transclusion => transclusion::resolve_transclusions(html, cx),
            Pass::VendorElements => vendor::resolve_vendor_elements(html),
            Pass::VendorAttributes => attributes::strip_vendor_attributes(html),
            Pass::Classes => attributes::strip_classes(html),
            Pass::LegacyTags => legacy::repair_legacy_tags(html),
            Pass::Images => images::resolve_image_paths(html, cx.anchor_path),
            Pass::CodeBlocks => code::enhance_code_blocks(html),
            Pass::BlockSpacing => whitespace::space_blocks(html),
            Pass::LineBreaks => whitespace::collapse_line_breaks(html),
            Pass::EmptyContainers => containers::remove_empty_containers(html),
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The markup transform pipeline.
///
/// Holds no state between calls; one instance can normalize any number of
/// documents.
#[derive(Clone, Copy)]
pub struct Pipeline<'s> {
    snippets: SnippetLoader<'s>,
}

impl<'s> Pipeline<'s> {
    /// Create a pipeline that loads snippets from `storage`.
    #[must_use]
    pub fn new(storage: &'s dyn hd_storage::Storage) -> Self {
        Self {
            snippets: SnippetLoader::new(storage),
        }
    }

    /// Normalize a document body.
    ///
    /// `anchor_path` is the site path of the document the body came from; it
    /// anchors relative snippet and image references.
    #[must_use]
    pub fn normalize(&self, raw_body: &str, anchor_path: &str) -> String {
        self.normalize_with_report(raw_body, anchor_path).0
    }

    /// Normalize a document body and report unresolved snippets.
    #[must_use]
    pub fn normalize_with_report(&self, raw_body: &str, anchor_path: &str) -> (String, LoadReport) {
        let mut cx = PassContext::new(anchor_path, &self.snippets);
        let mut html = raw_body.replace("\r\n", "\n");

        for pass in Pass::ORDER {
            html = pass.apply(&html, &mut cx);
            tracing::trace!(pass = %pass, len = html.len(), "Applied pass");
        }

        let report = cx.into_report();
        if !report.is_clean() {
            tracing::debug!(
                path = %anchor_path,
                missing = report.missing_snippets.len(),
                "Normalized with missing snippets"
            );
        }
        (html.trim().to_owned(), report)
    }
}
