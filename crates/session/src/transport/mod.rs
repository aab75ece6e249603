//! HTTP access to the catalog.
//!
//! Everything the session needs from HTTP is a `GET` or a `HEAD` for a URL,
//! so that is all [`Transport`] offers. The production implementation is
//! [`ReqwestTransport`] behind a [`ConcurrencyLimit`] (see [`http`]); tests
//! use `MockTransport` (feature `mock`).

mod client;
mod limit;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use self::client::ReqwestTransport;
pub use self::limit::ConcurrencyLimit;
#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockTransport;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;
use url::Url;

pub type TransportHandle = Arc<dyn Transport + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
}
impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
        })
    }
}

/// A fully-read response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// Header names are compared case-insensitively, see [`header`](Self::header).
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}
impl Response {
    pub fn new(status: u16) -> Self {
        Self { status, ..Self::default() }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// First value of the header `name`, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx response into an [`HttpStatus`](ErrorKind::HttpStatus) error.
    pub fn error_for_status(self, url: &Url) -> Result<Self> {
        if !self.is_success() {
            exn::bail!(ErrorKind::HttpStatus { url: url.to_string(), status: self.status });
        }
        Ok(self)
    }
}

/// Sends requests to the catalog.
///
/// Implementations must not fail on non-2xx statuses; status handling is the
/// caller's job. The response body must be read in full before `send`
/// returns, so that a [`ConcurrencyLimit`] around it covers the whole request.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, url: &Url) -> Result<Response>;
}

/// HTTP transport allowing at most `max_conns` requests in flight.
pub fn http(max_conns: usize) -> Result<ConcurrencyLimit<ReqwestTransport>> {
    ConcurrencyLimit::new(ReqwestTransport::new(max_conns)?, max_conns)
}

/// `GET` a URL, returning its body if the response was successful.
pub(crate) async fn get(transport: &dyn Transport, url: &Url) -> Result<Vec<u8>> {
    Ok(transport.send(Method::Get, url).await?.error_for_status(url)?.body)
}

/// `HEAD` a URL, returning the response if it was successful.
pub(crate) async fn head(transport: &dyn Transport, url: &Url) -> Result<Response> {
    transport.send(Method::Head, url).await?.error_for_status(url)
}
