//! Storage abstraction for the helpdocs content pipeline.
//!
//! This crate provides a [`Storage`] trait for reading exported help topics and
//! snippet files from the underlying storage backend. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Backend flexibility** (filesystem today, object stores later)
//! - **Clean separation** between markup normalization and I/O operations
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `read()` and `scan()` methods
//! - [`StorageError`] with semantic [`StorageErrorKind`] categories
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! The filesystem backend lives in the `hd-storage-fs` crate.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use hd_storage::Storage;
//! use hd_storage_fs::FsStorage;
//!
//! let storage = FsStorage::new(PathBuf::from("public"));
//! let html = storage.read("/en/Content/Welcome.htm")?;
//! ```

#[cfg(feature = "mock")]
mod mock;
mod storage;

#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Storage, StorageError, StorageErrorKind, is_topic_file};
