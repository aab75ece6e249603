use crate::endpoints::page_url;
use crate::error::{ErrorKind, Result};
use crate::transport::{self, TransportHandle};
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use std::pin::Pin;
use url::Url;

/// Lazily produced asset ids of a search.
pub type SearchStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Ids and last page number of the first page of results.
fn parse_first_page(url: &Url, body: &[u8]) -> Result<(Vec<String>, u32)> {
    let ids = oga_extract::parse_search_results(body).or_raise(|| ErrorKind::MalformedPage(url.to_string()))?;
    let last_page = oga_extract::parse_last_page_number(body).or_raise(|| ErrorKind::MalformedPage(url.to_string()))?;
    Ok((ids, last_page))
}

fn parse_page(url: &Url, body: &[u8]) -> Result<Vec<String>> {
    oga_extract::parse_search_results(body).or_raise(|| ErrorKind::MalformedPage(url.to_string()))
}

/// Walks every page of the search `query`, yielding asset ids in page order.
///
/// Page `0` is fetched first and decides how many pages there are; the
/// catalog does not report that consistently on later pages, so it is never
/// re-read. Each page is only fetched once the ids of the previous one have
/// been consumed. `page_limit` caps the number of pages fetched.
///
/// There is no retry: the first failure is yielded and ends the stream.
pub fn paginate(transport: TransportHandle, query: Url, page_limit: Option<u32>) -> SearchStream {
    Box::pin(stream! {
        let url = page_url(&query, 0);
        tracing::debug!(%url, page = 0, "Fetching search page");
        let body = match transport::get(transport.as_ref(), &url).await {
            Ok(body) => body,
            Err(err) => { yield Err(err); return; },
        };
        let (ids, mut last_page) = match parse_first_page(&url, &body) {
            Ok(parsed) => parsed,
            Err(err) => { yield Err(err); return; },
        };
        if let Some(limit) = page_limit {
            last_page = last_page.min(limit.saturating_sub(1));
        }
        tracing::debug!(results = ids.len(), last_page, "Parsed first search page");
        for id in ids {
            yield Ok(id);
        }
        for page in 1..=last_page {
            let url = page_url(&query, page);
            tracing::debug!(%url, page, "Fetching search page");
            let body = match transport::get(transport.as_ref(), &url).await {
                Ok(body) => body,
                Err(err) => { yield Err(err); return; },
            };
            let ids = match parse_page(&url, &body) {
                Ok(ids) => ids,
                Err(err) => { yield Err(err); return; },
            };
            for id in ids {
                yield Ok(id);
            }
        }
    })
}
