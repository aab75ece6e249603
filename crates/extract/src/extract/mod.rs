//! Main extraction logic for catalog pages.

mod search;

pub use self::search::SearchPage;
use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::models::{AssetRecord, AssetType, LicenseType};
use exn::{OptionExt, ResultExt};
use percent_encoding::percent_decode_str;
use scraper::{ElementRef, Html, Selector};
use tracing::instrument;

/// Returns the single element matching `selector`.
///
/// The catalog's page structure is rigid; a section that is missing or
/// repeated means the page is not what we think it is.
pub(crate) fn exactly_one<'a>(document: &'a Html, selector: &Selector, section: &'static str) -> Result<ElementRef<'a>> {
    let mut matches = document.select(selector);
    let element = matches.next().ok_or_raise(|| ErrorKind::MissingSection(section))?;
    if matches.next().is_some() {
        exn::bail!(ErrorKind::DuplicateSection(section));
    }
    Ok(element)
}

pub(crate) fn text_of(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Strips everything up to (and including) the files directory from a file
/// link, after percent-decoding it.
pub(crate) fn file_id_from_href(href: &str) -> String {
    let decoded = percent_decode_str(href).decode_utf8_lossy();
    match decoded.rfind(consts::FILES_PREFIX) {
        Some(index) => decoded[index + consts::FILES_PREFIX.len()..].to_string(),
        None => decoded.into_owned(),
    }
}

/// Extractor for an asset's detail page.
#[derive(Debug)]
pub struct AssetPage {
    document: Html,
}
impl AssetPage {
    pub fn from_html(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn from_bytes(html: &[u8]) -> Self {
        Self::from_html(&String::from_utf8_lossy(html))
    }

    /// Extracts everything the page says about the asset `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the author, type, licenses, tags, favorites
    /// or files sections is missing or appears more than once, or if one of
    /// their values cannot be parsed.
    #[instrument(skip(self))]
    pub fn record(&self, id: &str) -> Result<AssetRecord> {
        let (author, author_name) = self.author()?.unzip();
        Ok(AssetRecord {
            id: id.to_string(),
            author,
            author_name,
            kind: self.kind()?,
            licenses: self.licenses()?,
            tags: self.tags()?,
            favorites: self.favorites()?,
            file_ids: self.file_ids()?,
            name: self.name(),
            description: self.description(),
            attribution: self.attribution(),
            collections: self.collections(),
        })
    }

    /// Returns the submitter's `(username, display name)`.
    fn author(&self) -> Result<Option<(String, String)>> {
        let section = exactly_one(&self.document, &consts::AUTHOR_SECTION_SELECTOR, "author")?;
        Ok(section.select(&consts::ANCHOR_SELECTOR).find_map(|anchor| {
            let username = anchor.value().attr("href")?.strip_prefix(consts::USERS_PREFIX)?;
            Some((username.to_string(), text_of(&anchor)))
        }))
    }

    fn kind(&self) -> Result<AssetType> {
        let section = exactly_one(&self.document, &consts::TYPE_SECTION_SELECTOR, "type")?;
        let anchor = section.select(&consts::ANCHOR_SELECTOR).next().ok_or_raise(|| ErrorKind::MissingSection("type"))?;
        text_of(&anchor).parse()
    }

    fn licenses(&self) -> Result<Vec<LicenseType>> {
        let section = exactly_one(&self.document, &consts::LICENSES_SECTION_SELECTOR, "licenses")?;
        let mut licenses = Vec::new();
        for element in section.select(&consts::LICENSE_NAME_SELECTOR) {
            let license: LicenseType = text_of(&element).parse()?;
            if !licenses.contains(&license) {
                licenses.push(license);
            }
        }
        Ok(licenses)
    }

    fn tags(&self) -> Result<Vec<String>> {
        let section = exactly_one(&self.document, &consts::TAGS_SECTION_SELECTOR, "tags")?;
        Ok(section.select(&consts::ANCHOR_SELECTOR).map(|anchor| text_of(&anchor)).collect())
    }

    fn favorites(&self) -> Result<u64> {
        let section = exactly_one(&self.document, &consts::FAVORITES_SECTION_SELECTOR, "favorites")?;
        let item = section
            .select(&consts::FIELD_ITEM_SELECTOR)
            .next()
            .ok_or_raise(|| ErrorKind::MissingSection("favorites"))?;
        let value = text_of(&item);
        value.replace(',', "").parse::<u64>().or_raise(|| ErrorKind::ParseError { field: "favorites", value })
    }

    fn file_ids(&self) -> Result<Vec<String>> {
        let section = exactly_one(&self.document, &consts::FILES_SECTION_SELECTOR, "files")?;
        let mut ids = Vec::new();
        for file in section.select(&consts::FILE_SELECTOR) {
            let href = file
                .select(&consts::ANCHOR_SELECTOR)
                .find_map(|anchor| anchor.value().attr("href"))
                .ok_or_raise(|| ErrorKind::ParseError {
                    field: "files",
                    value: text_of(&file),
                })?;
            let id = file_id_from_href(href);
            if id.is_empty() {
                exn::bail!(ErrorKind::ParseError {
                    field: "files",
                    value: href.to_string(),
                });
            }
            ids.push(id);
        }
        Ok(ids)
    }

    fn name(&self) -> Option<String> {
        self.document.select(&consts::TITLE_SELECTOR).next().map(|el| text_of(&el)).filter(|s| !s.is_empty())
    }

    fn description(&self) -> Option<String> {
        self.document.select(&consts::DESCRIPTION_SELECTOR).next().map(|el| text_of(&el)).filter(|s| !s.is_empty())
    }

    fn attribution(&self) -> Option<String> {
        let mut matches = self.document.select(&consts::ATTRIBUTION_SELECTOR);
        match (matches.next(), matches.next()) {
            (Some(element), None) => Some(text_of(&element)).filter(|s| !s.is_empty()),
            _ => None,
        }
    }

    fn collections(&self) -> Vec<String> {
        self.document
            .select(&consts::COLLECTION_SELECTOR)
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter_map(|href| href.rsplit_once(consts::CONTENT_PREFIX).map(|(_, id)| id.to_string()))
            .filter(|id| !id.is_empty())
            .collect()
    }
}
