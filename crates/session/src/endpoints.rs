//! URLs of the catalog pages the session talks to.

use crate::error::{ErrorKind, Result};
use crate::search::SearchFilters;
use exn::OptionExt;
use url::Url;

const SEARCH_PATH: &str = "art-search-advanced";

fn with_path<'s>(base: &Url, segments: impl IntoIterator<Item = &'s str>) -> Result<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .ok()
        .ok_or_raise(|| ErrorKind::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn non_empty<'s>(id: &'s str, what: &str) -> Result<&'s str> {
    if id.is_empty() {
        exn::bail!(ErrorKind::Validation(format!("{what} must not be empty")));
    }
    Ok(id)
}

/// Detail page of an asset: `<base>/content/<asset_id>`.
pub fn content_url(base: &Url, asset_id: &str) -> Result<Url> {
    with_path(base, ["content", non_empty(asset_id, "asset id")?])
}

/// A downloadable file: `<base>/sites/default/files/<file_id>`.
///
/// File ids may contain `/`; each part becomes its own (percent-encoded)
/// path segment.
pub fn file_url(base: &Url, file_id: &str) -> Result<Url> {
    let file_id = non_empty(file_id, "file id")?;
    with_path(base, ["sites", "default", "files"].into_iter().chain(file_id.split('/')))
}

/// Advanced search query for `filters`, without a page number.
pub fn search_url(base: &Url, filters: &SearchFilters) -> Result<Url> {
    let mut url = with_path(base, [SEARCH_PATH])?;
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("keys", filters.keys())
            .append_pair("title", filters.title())
            .append_pair("name", filters.submitter())
            .append_pair("field_art_tags_tid", &filters.tags().join(", "))
            .append_pair("field_art_tags_tid_op", filters.tag_operator().origin_code());
        for kind in filters.types() {
            query.append_pair("field_art_type_tid[]", kind.search_code());
        }
        for license in filters.licenses() {
            query.append_pair("field_art_licenses_tid[]", license.search_code());
        }
        query
            .append_pair("sort_by", filters.sort_by().origin_code())
            .append_pair("sort_order", filters.order().origin_code())
            .append_pair("items_per_page", &filters.page_size().to_string());
    }
    Ok(url)
}

/// `query` with its (zero-based) page number set.
pub fn page_url(query: &Url, page: u32) -> Url {
    let mut url = query.clone();
    let pairs: Vec<(String, String)> = query
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut().clear().extend_pairs(pairs).append_pair("page", &page.to_string());
    url
}
