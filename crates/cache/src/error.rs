//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The storage backend failed; the underlying storage error is attached.
    #[display("storage error")]
    Storage,
    /// A manifest could not be (de)serialized.
    #[display("invalid cache data: {_0}")]
    InvalidData(#[error(not(source))] String),
    /// An asset or file id cannot be mapped to a location inside the cache.
    #[display("invalid id: {_0}")]
    InvalidId(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Only the storage layer knows; see the attached child error.
        matches!(self, Self::Storage)
    }
}
