use crate::endpoints::file_url;
use crate::error::{ErrorKind, Result};
use crate::transport::{self, Transport};
use exn::ResultExt;
use futures::future::join_all;
use oga_cache::FileCache;
use oga_extract::models::{Asset, AssetFile};
use tracing::instrument;
use url::Url;

/// Outcome of downloading a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Download {
    /// The stored copy already had the catalog's fingerprint; nothing was fetched.
    Cached,
    /// The file was fetched and saved.
    Fetched { bytes: u64 },
}

/// Fetches `file` into the cache unless the stored copy is current.
#[instrument(skip(transport, base, cache, file), fields(file_id = %file.id))]
pub(crate) async fn download_asset_file(
    transport: &dyn Transport,
    base: &Url,
    cache: &FileCache,
    asset_id: &str,
    file: &AssetFile,
) -> Result<Download> {
    let stored = cache.get_fingerprint(asset_id, &file.id).await.or_raise(|| ErrorKind::Cache)?;
    if stored.as_deref() == Some(file.fingerprint.as_str()) {
        tracing::debug!(fingerprint = %file.fingerprint, "File is already cached");
        return Ok(Download::Cached);
    }
    let url = file_url(base, &file.id)?;
    let bytes = transport::get(transport, &url).await?;
    cache
        .save(asset_id, &file.id, &file.fingerprint, &bytes)
        .await
        .or_raise(|| ErrorKind::Cache)?;
    let size = bytes.len() as u64;
    tracing::info!(%url, bytes = size, "Downloaded file");
    Ok(Download::Fetched { bytes: size })
}

/// Downloads every file of `asset`.
///
/// All files are attempted even if some fail; files that were saved stay
/// saved. The first failure, in file order, is returned.
#[instrument(skip(transport, base, cache, asset), fields(asset_id = %asset.id, files = asset.files.len()))]
pub(crate) async fn download_asset(transport: &dyn Transport, base: &Url, cache: &FileCache, asset: &Asset) -> Result<()> {
    let downloads = asset
        .files
        .iter()
        .map(|file| download_asset_file(transport, base, cache, &asset.id, file));
    let results = join_all(downloads).await;
    let failed = results.iter().filter(|result| result.is_err()).count();
    if failed > 0 {
        tracing::warn!(failed, "Some files could not be downloaded");
    }
    results.into_iter().try_for_each(|result| result.map(drop))
}
