use super::{Method, Response, Transport};
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use tokio::sync::Semaphore;
use url::Url;

/// Caps the number of requests in flight through `inner`.
///
/// A request holds its slot from before it is sent until `inner` has
/// returned the fully-read response; further requests wait for a free slot.
pub struct ConcurrencyLimit<T> {
    inner: T,
    permits: Semaphore,
}
impl<T: Transport> ConcurrencyLimit<T> {
    /// # Errors
    ///
    /// Returns [`Validation`](ErrorKind::Validation) if `max_conns` is zero.
    pub fn new(inner: T, max_conns: usize) -> Result<Self> {
        if max_conns == 0 {
            exn::bail!(ErrorKind::Validation("max_conns must be at least 1".into()));
        }
        Ok(Self {
            inner,
            permits: Semaphore::new(max_conns),
        })
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for ConcurrencyLimit<T> {
    async fn send(&self, method: Method, url: &Url) -> Result<Response> {
        let _permit = self.permits.acquire().await.or_raise(|| ErrorKind::Transport(url.to_string()))?;
        self.inner.send(method, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::describe_asset;
    use crate::fixtures;
    use crate::transport::MockTransport;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BASE: &str = "https://oga.test";

    /// Keeps every request open for a few scheduler turns, tracking how many
    /// overlap.
    struct Slow {
        inner: MockTransport,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }
    impl Slow {
        fn new(inner: MockTransport) -> Self {
            Self {
                inner,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }

        fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for Slow {
        async fn send(&self, method: Method, url: &Url) -> Result<Response> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            for _ in 0..5 {
                tokio::task::yield_now().await;
            }
            let response = self.inner.send(method, url).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            response
        }
    }

    fn catalog(files: &[&str]) -> MockTransport {
        let page = Response::ok().with_body(fixtures::asset_page(files));
        files.iter().fold(
            MockTransport::default().route(Method::Get, &format!("{BASE}/content/x"), page),
            |transport, file| {
                let head = Response::ok().with_header("ETag", "\"f\"").with_header("Content-Length", "1");
                transport.route(Method::Head, &format!("{BASE}/sites/default/files/{file}"), head)
            },
        )
    }

    const FILES: [&str; 6] = ["a.png", "b.png", "c.png", "d.png", "e.png", "f.png"];

    #[test]
    fn test_zero_connections_rejected() {
        let err = ConcurrencyLimit::new(MockTransport::default(), 0).err().unwrap();
        assert!(matches!(&*err, ErrorKind::Validation(_)));
    }

    #[tokio::test]
    async fn test_fan_out_without_limit_overlaps() {
        let transport = Slow::new(catalog(&FILES));
        let asset = describe_asset(&transport, &Url::parse(BASE).unwrap(), "x").await.unwrap();
        assert_eq!(asset.files.len(), FILES.len());
        assert_eq!(transport.peak(), FILES.len());
    }

    #[rstest::rstest]
    #[case(1)]
    #[case(2)]
    #[case(4)]
    #[tokio::test]
    async fn test_fan_out_respects_limit(#[case] max_conns: usize) {
        let transport = ConcurrencyLimit::new(Slow::new(catalog(&FILES)), max_conns).unwrap();
        let asset = describe_asset(&transport, &Url::parse(BASE).unwrap(), "x").await.unwrap();
        assert_eq!(asset.files.len(), FILES.len());
        assert_eq!(transport.inner().peak(), max_conns);
        assert_eq!(transport.inner().inner.count(Method::Head), FILES.len());
    }
}
