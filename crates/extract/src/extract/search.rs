use super::text_of;
use crate::consts;
use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use scraper::Html;
use tracing::instrument;

/// Extractor for a single page of advanced search results.
#[derive(Debug)]
pub struct SearchPage {
    document: Html,
}
impl SearchPage {
    pub fn from_html(html: &str) -> Self {
        Self { document: Html::parse_document(html) }
    }

    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn from_bytes(html: &[u8]) -> Self {
        Self::from_html(&String::from_utf8_lossy(html))
    }

    /// Asset ids in the order they are listed on the page.
    ///
    /// A page without a results container is an empty page (the catalog
    /// renders no container at all when nothing matched), not an error.
    #[instrument(level = "trace", skip(self))]
    pub fn asset_ids(&self) -> Result<Vec<String>> {
        let mut containers = self.document.select(&consts::RESULTS_SELECTOR);
        let Some(container) = containers.next() else {
            return Ok(Vec::new());
        };
        if containers.next().is_some() {
            exn::bail!(ErrorKind::DuplicateSection("search results"));
        }
        let mut ids = Vec::new();
        for anchor in container.select(&consts::RESULT_TITLE_SELECTOR) {
            let href = anchor.value().attr("href").ok_or_raise(|| ErrorKind::ParseError {
                field: "search result",
                value: text_of(&anchor),
            })?;
            let id = href
                .strip_prefix(consts::CONTENT_PREFIX)
                .filter(|id| !id.is_empty())
                .ok_or_raise(|| ErrorKind::ParseError {
                    field: "search result",
                    value: href.to_string(),
                })?;
            ids.push(id.to_string());
        }
        Ok(ids)
    }

    /// Zero-based number of the last page of results.
    ///
    /// Returns `0` when the pager has no "last" control, meaning everything
    /// fits on a single page (which may itself be empty).
    #[instrument(level = "trace", skip(self))]
    pub fn last_page(&self) -> Result<u32> {
        let mut pagers = self.document.select(&consts::PAGER_LAST_SELECTOR);
        let Some(pager) = pagers.next() else {
            return Ok(0);
        };
        if pagers.next().is_some() {
            exn::bail!(ErrorKind::DuplicateSection("pager"));
        }
        let href = pager
            .select(&consts::ANCHOR_SELECTOR)
            .find_map(|anchor| anchor.value().attr("href"))
            .ok_or_raise(|| ErrorKind::MissingSection("pager"))?;
        let captures = consts::PAGE_REGEX.captures(href).ok_or_raise(|| ErrorKind::ParseError {
            field: "last page",
            value: href.to_string(),
        })?;
        let page = &captures[1];
        page.parse::<u32>().or_raise(|| ErrorKind::ParseError {
            field: "last page",
            value: page.to_string(),
        })
    }
}
