//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Every variant means the page does not have the structure the catalog is
/// known to produce. None of them are worth retrying against the same page.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required section of the page could not be found.
    #[display("missing required section: {_0}")]
    MissingSection(#[error(not(source))] &'static str),
    /// A section that should appear exactly once appeared more than once.
    #[display("section appears more than once: {_0}")]
    DuplicateSection(#[error(not(source))] &'static str),
    /// A section was found but its value could not be parsed.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// The offending value.
        value: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The page is either well-formed or it isn't.
        false
    }
}
