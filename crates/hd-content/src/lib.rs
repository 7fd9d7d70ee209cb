//! Normalization and transclusion pipeline for exported help topics.
//!
//! Help topics arrive as HTML exported from an authoring tool, full of vendor
//! markup: `MadCap:` elements and attributes, snippet transclusion directives,
//! conditional text, styling classes and legacy tags. This crate turns such a
//! topic into a clean HTML fragment with site-rooted asset paths.
//!
//! # Architecture
//!
//! Components, leaf first:
//!
//! - [`resolve`]: resolves `src`/`href` references against the document that
//!   contains them
//! - [`SnippetLoader`]: reads snippet files for transclusion
//! - [`Pipeline`]: the ordered markup passes (see [`Pass::ORDER`])
//! - [`TopicLoader`]: reads a topic, extracts its title and body, runs the
//!   pipeline
//!
//! All storage access goes through the [`Storage`](hd_storage::Storage) trait.
//! Nothing here fails on malformed input: missing snippets become visible
//! placeholders, a missing `<body>` means the whole file is the body, and a
//! missing title becomes `"Untitled"`.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use hd_content::TopicLoader;
//! use hd_storage_fs::FsStorage;
//!
//! let loader = TopicLoader::new(Arc::new(FsStorage::new(PathBuf::from("public"))));
//! if let Some(topic) = loader.load("/en/Content/Explore/Getting-Started.htm") {
//!     println!("{}\n\n{}", topic.title, topic.body_html);
//! }
//! ```

mod code_language;
mod html;
mod path;
mod pipeline;
mod slug;
mod snippet;
mod topic;

pub use code_language::{DEFAULT_LANGUAGE, LANGUAGE_RULES, LanguageRule, detect_language};
pub use path::{is_absolute, normalize_site_path, resolve};
pub use pipeline::{LoadReport, MissingSnippet, Pass, Pipeline};
pub use slug::href_to_slug;
pub use snippet::{SnippetLoader, snippet_path};
pub use topic::{ParsedTopic, TopicLoader, UNTITLED, extract_title};
