//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait for reading topic and snippet files,
//! along with [`StorageError`] for unified error handling across backends.
//!
//! # Site Path Convention
//!
//! All path parameters in Storage methods are **site-rooted paths**, not file paths:
//! - `"/en/Content/Welcome.htm"` - a topic in the English tree
//! - `"/en/Resources/Snippets/Note.flsnp"` - a snippet file
//! - `"/es/"` - a language prefix (used by [`Storage::scan`])
//!
//! The first segment is the language. The leading `/` is optional. Storage
//! implementations handle the mapping from site paths to their internal format.

use std::path::PathBuf;

/// Semantic error categories (inspired by Object Store + `OpenDAL`).
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path or identifier.
    InvalidPath,
    /// Operation timed out.
    Timeout,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Whether this error means the file simply isn't there.
    ///
    /// Not-found is an expected outcome for topics and snippets; callers use
    /// this to pick a log level and a fallback.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::TimedOut => StorageErrorKind::Timeout,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::Timeout => "Timeout",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Check whether a file name looks like an exported topic (`.htm` / `.html`).
///
/// Snippet files (`.flsnp`) are not topics and are never returned by a scan.
#[must_use]
pub fn is_topic_file(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".htm") || lower.ends_with(".html")
}

/// Storage abstraction for topic and snippet retrieval.
///
/// Provides a unified interface for reading content regardless of backend.
/// The content pipeline only ever needs "read file at path X as text, or report
/// not-found"; `scan` serves batch tooling such as `hd check`.
///
/// Implementations must be safe to share between threads: independent topic
/// loads run concurrently against one storage instance.
///
/// # Site Paths
///
/// All path parameters are **site-rooted paths**, not file paths:
/// - `"/en/Content/Welcome.htm"`
/// - `"en/Content/Welcome.htm"` (leading slash optional)
pub trait Storage: Send + Sync {
    /// Read a file as UTF-8 text.
    ///
    /// # Arguments
    ///
    /// * `path` - Site path (e.g., "/en/Content/Welcome.htm")
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] with [`StorageErrorKind::NotFound`] if the file
    /// doesn't exist, or another kind if it can't be read.
    fn read(&self, path: &str) -> Result<String, StorageError>;

    /// List topic files below a site path prefix.
    ///
    /// Returns site-rooted paths (always with a leading `/`), sorted
    /// lexicographically. Only topic files (see [`is_topic_file`]) are listed.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Site path prefix (e.g., "/en/", "/en/Content/Explore")
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if listing fails (e.g., invalid prefix). A
    /// missing prefix yields an empty list.
    fn scan(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}
