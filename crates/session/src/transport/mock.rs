//! Scripted transport for testing.

use super::{Method, Response, Transport};
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

#[derive(Debug, Clone)]
enum Route {
    Respond(Response),
    Fail,
}

/// In-memory [`Transport`] answering from a fixed set of routes.
///
/// Requests for an unknown route are answered with a `404`. Every request is
/// logged, so tests can assert on exactly what was sent.
///
/// # Examples
///
/// Requires the `mock` feature.
///
/// ```ignore
/// use oga_session::transport::{Method, MockTransport, Response, Transport};
/// use url::Url;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = MockTransport::default()
///     .route(Method::Get, "https://oga.test/content/x", Response::ok().with_body("<html></html>"));
/// let url = Url::parse("https://oga.test/content/x")?;
/// assert_eq!(transport.send(Method::Get, &url).await?.status, 200);
/// assert_eq!(transport.count(Method::Get), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MockTransport {
    routes: HashMap<(Method, String), Route>,
    requests: Mutex<Vec<(Method, Url)>>,
}
impl MockTransport {
    fn key(method: Method, url: &str) -> (Method, String) {
        let Ok(url) = Url::parse(url) else {
            // Deliberate: a broken route means a broken test.
            panic!("MockTransport: invalid route URL {url}");
        };
        (method, url.to_string())
    }

    /// Answer requests for `url` with `response`.
    pub fn route(mut self, method: Method, url: &str, response: Response) -> Self {
        self.routes.insert(Self::key(method, url), Route::Respond(response));
        self
    }

    /// Fail requests for `url` as if the connection dropped.
    pub fn fail(mut self, method: Method, url: &str) -> Self {
        self.routes.insert(Self::key(method, url), Route::Fail);
        self
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<(Method, Url)> {
        self.requests.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Number of requests sent so far with `method`.
    pub fn count(&self, method: Method) -> usize {
        self.requests().iter().filter(|(sent, _)| *sent == method).count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, method: Method, url: &Url) -> Result<Response> {
        if let Ok(mut log) = self.requests.lock() {
            log.push((method, url.clone()));
        }
        match self.routes.get(&(method, url.to_string())) {
            Some(Route::Respond(response)) => Ok(response.clone()),
            Some(Route::Fail) => exn::bail!(ErrorKind::Transport(url.to_string())),
            None => Ok(Response::new(404)),
        }
    }
}
