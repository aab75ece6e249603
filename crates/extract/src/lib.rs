mod consts;
pub mod error;
mod extract;
pub mod models;

use tracing::instrument;

pub use crate::consts::{CONTENT_PREFIX, FILES_PREFIX};
use crate::error::Result;
pub use crate::extract::{AssetPage, SearchPage};
use crate::models::AssetRecord;

/// Easy, top-level entrypoint for extracting an [`AssetRecord`] from the raw
/// HTML bytes of an asset's detail page.
///
/// Accepts raw bytes, instead of requiring HTML to be valid UTF-8. Invalid byte
/// sequences are replaced with U+FFFD during parsing. See [`AssetPage`] for
/// more details.
#[instrument(skip(html), fields(html_size = html.as_ref().len()))]
pub fn parse_asset(id: &str, html: impl AsRef<[u8]>) -> Result<AssetRecord> {
    AssetPage::from_bytes(html.as_ref()).record(id)
}

/// Asset ids listed on one page of search results, in page order.
#[instrument(skip(html), fields(html_size = html.as_ref().len()))]
pub fn parse_search_results(html: impl AsRef<[u8]>) -> Result<Vec<String>> {
    SearchPage::from_bytes(html.as_ref()).asset_ids()
}

/// Zero-based number of the last page of search results.
#[instrument(skip(html), fields(html_size = html.as_ref().len()))]
pub fn parse_last_page_number(html: impl AsRef<[u8]>) -> Result<u32> {
    SearchPage::from_bytes(html.as_ref()).last_page()
}
