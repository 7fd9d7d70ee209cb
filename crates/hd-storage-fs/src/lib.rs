//! Filesystem storage implementation for the helpdocs content pipeline.
//!
//! This crate provides [`FsStorage`], a filesystem-based implementation of the
//! [`Storage`](hd_storage::Storage) trait. The content root holds one directory
//! per language, mirroring the site layout:
//!
//! ```text
//! public/
//! ├── en/
//! │   ├── Content/Explore/Getting-Started.htm
//! │   └── Resources/Snippets/Note.flsnp
//! └── es/
//!     └── Content/...
//! ```
//!
//! Site path `/en/Content/Explore/Getting-Started.htm` maps to
//! `public/en/Content/Explore/Getting-Started.htm`.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use hd_storage::Storage;
//! use hd_storage_fs::FsStorage;
//!
//! let storage = FsStorage::new(PathBuf::from("public"));
//! for path in storage.scan("/en/")? {
//!     println!("{path}");
//! }
//! ```

mod scanner;

use std::fs;
use std::path::{Path, PathBuf};

use hd_storage::{Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage rooted at a content directory.
#[derive(Debug, Clone)]
pub struct FsStorage {
    /// Content root (the directory containing language folders).
    root: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage.
    ///
    /// # Arguments
    ///
    /// * `root` - Content root directory (e.g., `public/`)
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Content root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate a site path.
    ///
    /// Rejects paths containing a `..` segment to prevent path traversal. The
    /// content pipeline always hands over collapsed paths, so a `..` here means
    /// the caller bypassed path resolution.
    fn validate_path(path: &str) -> Result<(), StorageError> {
        if path.split(['/', '\\']).any(|segment| segment == "..") {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Map a site path to a file path under the content root.
    fn file_path(&self, path: &str) -> PathBuf {
        let relative = path.trim_start_matches('/');
        if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }
}

impl Storage for FsStorage {
    fn read(&self, path: &str) -> Result<String, StorageError> {
        Self::validate_path(path)?;
        let full_path = self.file_path(path);
        if !full_path.is_file() {
            return Err(StorageError::not_found(path).with_backend(BACKEND));
        }
        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::io(e, Some(PathBuf::from(path))).with_backend(BACKEND))
    }

    fn scan(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Self::validate_path(prefix)?;
        let trimmed = prefix.trim_matches('/');
        let site_prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };
        let paths = scanner::scan_topics(&self.file_path(trimmed), &site_prefix);
        tracing::debug!(prefix = %prefix, count = paths.len(), "Topic scan completed");
        Ok(paths)
    }
}
