//! Session Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Errors from the parser, the file
//! cache and the HTTP client are attached as children of these.

use derive_more::{Display, Error};

/// A session error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request could not be completed (connection, TLS, body read).
    #[display("request failed: {_0}")]
    Transport(#[error(not(source))] String),
    /// The catalog answered with a non-success status code.
    #[display("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },
    /// A file `HEAD` response lacked a required header.
    #[display("missing {header} header from {url}")]
    MissingHeader { url: String, header: &'static str },
    /// A file `HEAD` response had a header that could not be understood.
    #[display("invalid {header} header from {url}")]
    InvalidHeader { url: String, header: &'static str },
    /// The page does not have the structure the catalog is known to produce.
    #[display("malformed page: {_0}")]
    MalformedPage(#[error(not(source))] String),
    /// A caller-supplied parameter is outside its permitted set.
    #[display("invalid parameter: {_0}")]
    Validation(#[error(not(source))] String),
    /// A catalog URL could not be built.
    #[display("invalid URL: {_0}")]
    InvalidUrl(#[error(not(source))] String),
    /// Reading or writing the local file cache failed.
    #[display("file cache error")]
    Cache,
    /// The runtime backing a blocking session could not be started.
    #[display("could not start async runtime")]
    Runtime,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
