use crate::describe;
use crate::download::{self, Download};
use crate::endpoints::search_url;
use crate::error::{ErrorKind, Result};
use crate::search::{SearchFilters, SearchStream, paginate};
use crate::transport::{self, TransportHandle};
use exn::ResultExt;
use oga_cache::FileCache;
use oga_config::Config;
use oga_extract::models::{Asset, AssetFile};
use oga_storage::BackendHandle;
use oga_storage::backend::LocalBackend;
use std::sync::Arc;
use tracing::instrument;

/// Client for a single catalog, with its own connection pool and file cache.
///
/// Every operation shares the same connection cap (`max_conns`), so any mix
/// of searches, descriptions and downloads may run concurrently.
pub struct Session {
    config: Config,
    transport: TransportHandle,
    cache: FileCache,
}
impl Session {
    /// Session over HTTP, caching files under the configured root directory.
    ///
    /// Nothing is created on disk until the first file is cached.
    pub fn new(config: Config) -> Result<Self> {
        let transport = Arc::new(transport::http(config.max_conns)?);
        let backend = Arc::new(LocalBackend::new("local", &config.root_dir).or_raise(|| ErrorKind::Cache)?);
        Ok(Self::with_parts(config, transport, backend))
    }

    /// Session over an arbitrary transport and storage backend.
    pub fn with_parts(config: Config, transport: TransportHandle, backend: BackendHandle) -> Self {
        Self {
            config,
            transport,
            cache: FileCache::new(backend),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &FileCache {
        &self.cache
    }

    /// Ids of every asset matching `filters`, fetched page by page as the
    /// stream is consumed.
    ///
    /// The query is built (and checked) before anything is sent.
    #[instrument(skip(self, filters))]
    pub fn search(&self, filters: &SearchFilters) -> Result<SearchStream> {
        let query = search_url(&self.config.url, filters)?;
        tracing::debug!(%query, "Starting search");
        Ok(paginate(self.transport.clone(), query, filters.page_limit()))
    }

    /// The asset `id`, with the size and fingerprint of each of its files.
    pub async fn describe_asset(&self, id: &str) -> Result<Asset> {
        describe::describe_asset(self.transport.as_ref(), &self.config.url, id).await
    }

    pub async fn describe_asset_file(&self, file_id: &str) -> Result<AssetFile> {
        describe::describe_asset_file(self.transport.as_ref(), &self.config.url, file_id).await
    }

    /// Brings every file of `asset` into the cache, skipping files whose
    /// stored fingerprint is current.
    pub async fn download_asset(&self, asset: &Asset) -> Result<()> {
        download::download_asset(self.transport.as_ref(), &self.config.url, &self.cache, asset).await
    }

    pub async fn download_asset_file(&self, asset_id: &str, file: &AssetFile) -> Result<Download> {
        download::download_asset_file(self.transport.as_ref(), &self.config.url, &self.cache, asset_id, file).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::transport::{Method, MockTransport, Response};
    use futures::TryStreamExt;
    use oga_cache::Manifest;
    use oga_storage::StorageBackend;
    use std::path::Path;

    const BASE: &str = "https://opengameart.org";

    fn session(transport: Arc<MockTransport>, root: &Path) -> Session {
        let config = Config::new(BASE, 2, &root.to_string_lossy()).unwrap();
        let backend = Arc::new(LocalBackend::new("local", root).unwrap());
        Session::with_parts(config, transport, backend)
    }

    fn imminent_threat() -> Arc<MockTransport> {
        let files = |name: &str| format!("{BASE}/sites/default/files/{name}");
        Arc::new(
            MockTransport::default()
                .route(
                    Method::Get,
                    &format!("{BASE}/content/imminent-threat"),
                    Response::ok().with_body(fixtures::asset_page(&["a.png", "b.ogg"])),
                )
                .route(
                    Method::Head,
                    &files("a.png"),
                    Response::ok().with_header("ETag", "\"abc\"").with_header("Content-Length", "9"),
                )
                .route(
                    Method::Head,
                    &files("b.ogg"),
                    Response::ok().with_header("ETag", "\"def\"").with_header("Content-Length", "9"),
                )
                .route(Method::Get, &files("a.png"), Response::ok().with_body("png bytes"))
                .route(Method::Get, &files("b.ogg"), Response::ok().with_body("ogg bytes")),
        )
    }

    #[tokio::test]
    async fn test_imminent_threat() {
        let root = tempfile::tempdir().unwrap();
        let transport = imminent_threat();
        let session = session(transport.clone(), root.path());

        let asset = session.describe_asset("imminent-threat").await.unwrap();
        assert_eq!(asset.files, vec![AssetFile::new("a.png", "abc", 9), AssetFile::new("b.ogg", "def", 9)]);
        session.download_asset(&asset).await.unwrap();
        assert_eq!(transport.count(Method::Get), 3);

        let manifest = std::fs::read_to_string(root.path().join("cache/imminent-threat")).unwrap();
        assert_eq!(manifest, "{\n    \"a.png\": \"abc\",\n    \"b.ogg\": \"def\"\n}");
        assert_eq!(std::fs::read(root.path().join("assets/imminent-threat/a.png")).unwrap(), b"png bytes");
        assert_eq!(std::fs::read(root.path().join("assets/imminent-threat/b.ogg")).unwrap(), b"ogg bytes");

        // Everything is current: a second download fetches nothing.
        session.download_asset(&asset).await.unwrap();
        assert_eq!(transport.count(Method::Get), 3);
    }

    #[tokio::test]
    async fn test_cache_survives_sessions() {
        let root = tempfile::tempdir().unwrap();
        let transport = imminent_threat();
        let first = session(transport.clone(), root.path());
        let asset = first.describe_asset("imminent-threat").await.unwrap();
        first.download_asset(&asset).await.unwrap();

        let second = session(transport.clone(), root.path());
        let file = &asset.files[0];
        let download = second.download_asset_file(&asset.id, file).await.unwrap();
        assert_eq!(download, Download::Cached);
        assert_eq!(transport.count(Method::Get), 3);
    }

    #[tokio::test]
    async fn test_deleted_file_is_fetched_again() {
        let root = tempfile::tempdir().unwrap();
        let transport = imminent_threat();
        let session = session(transport.clone(), root.path());
        let asset = session.describe_asset("imminent-threat").await.unwrap();
        session.download_asset(&asset).await.unwrap();

        std::fs::remove_file(root.path().join("assets/imminent-threat/b.ogg")).unwrap();
        let download = session.download_asset_file(&asset.id, &asset.files[1]).await.unwrap();
        assert_eq!(download, Download::Fetched { bytes: 9 });
        assert_eq!(transport.count(Method::Get), 4);
        let manifest = session.cache().manifest(&asset.id).await.unwrap();
        assert_eq!(manifest.get("b.ogg"), Some(&Some("def".to_string())));
    }

    #[tokio::test]
    async fn test_search_validates_before_network() {
        let root = tempfile::tempdir().unwrap();
        let transport = Arc::new(MockTransport::default());
        let session = session(transport.clone(), root.path());
        assert!(SearchFilters::default().with_page_size(25).is_err());
        let err = "popularity".parse::<crate::search::SortBy>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Validation(_)));
        // A valid but never-consumed search sends nothing either.
        let _stream = session.search(&SearchFilters::default().with_keys("battle")).unwrap();
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_search_then_describe() {
        let root = tempfile::tempdir().unwrap();
        let query = format!(
            "{BASE}/art-search-advanced?keys=threat&title=&name=&field_art_tags_tid=&field_art_tags_tid_op=or\
             &sort_by=count&sort_order=DESC&items_per_page=24&page=0"
        );
        let transport = MockTransport::default().route(
            Method::Get,
            &query,
            Response::ok().with_body(fixtures::search_page(&["imminent-threat"], None)),
        );
        let transport = Arc::new(transport);
        let session = session(transport.clone(), root.path());
        let ids: Vec<String> = session
            .search(&SearchFilters::default().with_keys("threat"))
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(ids, vec!["imminent-threat"]);
        assert_eq!(transport.count(Method::Get), 1);
    }

    #[tokio::test]
    async fn test_session_on_mock_storage() {
        let backend = Arc::new(oga_storage::backend::MockBackend::default());
        let config = Config::new(BASE, 1, "/unused").unwrap();
        let session = Session::with_parts(config, imminent_threat(), backend.clone());
        let asset = session.describe_asset("imminent-threat").await.unwrap();
        session.download_asset(&asset).await.unwrap();
        let manifest: Manifest = session.cache().manifest("imminent-threat").await.unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(backend.read(Path::new("assets/imminent-threat/b.ogg")).await.unwrap(), b"ogg bytes");
    }

    #[test]
    fn test_new_from_config() {
        let root = tempfile::tempdir().unwrap();
        let config = Config::new(BASE, 3, &root.path().to_string_lossy()).unwrap();
        let session = Session::new(config.clone()).unwrap();
        assert_eq!(session.config(), &config);
    }
}
