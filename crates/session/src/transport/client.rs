use super::{Method, Response, Transport};
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use tracing::instrument;
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// [`Transport`] backed by a shared `reqwest` connection pool.
///
/// The pool keeps up to `max_conns` idle connections per host but does not
/// limit how many requests are sent at once; wrap it in a
/// [`ConcurrencyLimit`](super::ConcurrencyLimit) for that, as [`http`](super::http) does.
pub struct ReqwestTransport {
    client: reqwest::Client,
}
impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns [`Validation`](ErrorKind::Validation) if `max_conns` is zero,
    /// or [`Transport`](ErrorKind::Transport) if the HTTP client cannot be
    /// initialized (e.g. no TLS backend).
    pub fn new(max_conns: usize) -> Result<Self> {
        if max_conns == 0 {
            exn::bail!(ErrorKind::Validation("max_conns must be at least 1".into()));
        }
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(max_conns)
            .build()
            .or_raise(|| ErrorKind::Transport("could not build HTTP client".into()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(level = "debug", skip(self, url), fields(%url, status = tracing::field::Empty))]
    async fn send(&self, method: Method, url: &Url) -> Result<Response> {
        let request = match method {
            Method::Get => self.client.get(url.clone()),
            Method::Head => self.client.head(url.clone()),
        };
        let response = request.send().await.or_raise(|| ErrorKind::Transport(url.to_string()))?;
        let status = response.status().as_u16();
        tracing::Span::current().record("status", status);
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = match method {
            Method::Get => response.bytes().await.or_raise(|| ErrorKind::Transport(url.to_string()))?.to_vec(),
            Method::Head => Vec::new(),
        };
        Ok(Response { status, headers, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_connections_rejected() {
        let err = ReqwestTransport::new(0).err().unwrap();
        assert!(matches!(&*err, ErrorKind::Validation(_)));
    }

    #[test]
    fn test_builds_client() {
        assert!(ReqwestTransport::new(1).is_ok());
        assert!(ReqwestTransport::new(16).is_ok());
    }
}
