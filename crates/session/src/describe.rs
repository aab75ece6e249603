use crate::endpoints::{content_url, file_url};
use crate::error::{ErrorKind, Result};
use crate::transport::{self, Transport};
use exn::{OptionExt, ResultExt};
use futures::future::join_all;
use oga_extract::models::{Asset, AssetFile, AssetRecord};
use tracing::instrument;
use url::Url;

const CONTENT_LENGTH: &str = "Content-Length";
const ETAG: &str = "ETag";

fn parse_record(url: &Url, id: &str, body: &[u8]) -> Result<AssetRecord> {
    oga_extract::parse_asset(id, body).or_raise(|| ErrorKind::MalformedPage(url.to_string()))
}

/// Entity tag without its surrounding quotes (and weak-validator prefix).
fn fingerprint(etag: &str) -> &str {
    let etag = etag.trim();
    let etag = etag.strip_prefix("W/").unwrap_or(etag);
    etag.trim_matches('"')
}

/// Size and fingerprint of a single file, from a `HEAD` request.
#[instrument(skip(transport, base))]
pub(crate) async fn describe_asset_file(transport: &dyn Transport, base: &Url, file_id: &str) -> Result<AssetFile> {
    let url = file_url(base, file_id)?;
    let response = transport::head(transport, &url).await?;
    let size = response
        .header(CONTENT_LENGTH)
        .ok_or_raise(|| ErrorKind::MissingHeader { url: url.to_string(), header: CONTENT_LENGTH })?
        .trim()
        .parse::<u64>()
        .or_raise(|| ErrorKind::InvalidHeader { url: url.to_string(), header: CONTENT_LENGTH })?;
    let etag = response
        .header(ETAG)
        .ok_or_raise(|| ErrorKind::MissingHeader { url: url.to_string(), header: ETAG })?;
    let fingerprint = fingerprint(etag);
    if fingerprint.is_empty() {
        exn::bail!(ErrorKind::InvalidHeader { url: url.to_string(), header: ETAG });
    }
    tracing::debug!(%url, size, fingerprint, "Described file");
    Ok(AssetFile::new(file_id, fingerprint, size))
}

/// Everything known about an asset: its detail page plus a `HEAD` per file.
///
/// The `HEAD` requests are all started at once; the transport decides how
/// many actually run in parallel. If any of them fails the whole description
/// fails, after the rest have finished.
#[instrument(skip(transport, base))]
pub(crate) async fn describe_asset(transport: &dyn Transport, base: &Url, id: &str) -> Result<Asset> {
    let url = content_url(base, id)?;
    let body = transport::get(transport, &url).await?;
    let record = parse_record(&url, id, &body)?;
    tracing::debug!(files = record.file_ids.len(), "Parsed asset page");
    let heads = record.file_ids.iter().map(|file_id| describe_asset_file(transport, base, file_id));
    let files = join_all(heads).await.into_iter().collect::<Result<Vec<_>>>()?;
    Ok(record.into_asset(files))
}
