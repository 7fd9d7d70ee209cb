//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, BTreeSet};

use crate::storage::{Storage, StorageError, StorageErrorKind, is_topic_file};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Normalize a site path to its leading-slash form.
fn site_key(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Mock storage for testing.
///
/// Stores file contents in memory, keyed by site path. Use the builder methods
/// to configure the mock with test data.
///
/// # Example
///
/// ```ignore
/// use hd_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("/en/Content/A.htm", "<html><body><p>Hi</p></body></html>");
///
/// let html = storage.read("/en/Content/A.htm").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: BTreeMap<String, String>,
    failing: BTreeSet<String>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add file content for a site path.
    #[must_use]
    pub fn with_file(mut self, path: &str, content: impl Into<String>) -> Self {
        self.files.insert(site_key(path), content.into());
        self
    }

    /// Make reads of a site path fail with a permission error.
    #[must_use]
    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.failing.insert(site_key(path));
        self
    }
}

impl Storage for MockStorage {
    fn read(&self, path: &str) -> Result<String, StorageError> {
        let key = site_key(path);
        if self.failing.contains(&key) {
            return Err(StorageError::new(StorageErrorKind::PermissionDenied)
                .with_path(key)
                .with_backend(BACKEND));
        }
        self.files
            .get(&key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(key).with_backend(BACKEND))
    }

    fn scan(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let prefix = site_key(prefix);
        // BTreeMap iteration is already sorted
        Ok(self
            .files
            .keys()
            .filter(|k| k.starts_with(&prefix) && is_topic_file(k))
            .cloned()
            .collect())
    }
}
