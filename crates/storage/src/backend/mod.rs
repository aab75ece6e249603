//! Storage backend trait and implementations.
//!
//! This module defines the `StorageBackend` trait, which provides a unified
//! interface for the handful of storage operations the file cache needs:
//! the local filesystem in production, memory in tests.

mod local;
#[cfg(feature = "mock")]
mod mock;

pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::MockBackend;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Unified interface for storage backends.
///
/// # Path Handling
/// All paths are relative to the storage root. Implementations normalize
/// them and reject any that would escape the root.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use oga_storage::{backend::StorageBackend, error::Result};
///
/// async fn manifest_or_empty(backend: &dyn StorageBackend) -> Result<Vec<u8>> {
///     let path = Path::new("cache/imminent-threat");
///     if backend.exists(path).await? {
///         backend.read(path).await
///     } else {
///         Ok(b"{}".to_vec())
///     }
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Name of the backend, recorded in cache spans.
    fn name(&self) -> &str;

    /// Check if a file exists.
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Read file contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write file contents.
    ///
    /// Creates a new file or overwrites an existing file with the provided
    /// data. Implementations should create parent directories as needed.
    ///
    /// ```no_run
    /// use std::path::Path;
    /// # use oga_storage::{backend::StorageBackend, error::Result};
    /// # async fn example(backend: &dyn StorageBackend) -> Result<()> {
    /// backend.write(Path::new("assets/imminent-threat/a.png"), b"\x89PNG").await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Delete a file.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    async fn delete(&self, path: &Path) -> Result<()>;
}
