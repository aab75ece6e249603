use super::{AssetType, LicenseType};

/// A single downloadable file belonging to an asset.
///
/// The `fingerprint` is whatever entity tag the catalog reported for the
/// file (surrounding quotes removed). It is opaque: two files are considered
/// identical if, and only if, their fingerprints are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AssetFile {
    /// File name relative to the catalog's files directory.
    pub id: String,
    /// Entity tag reported by the catalog.
    #[cfg_attr(feature = "serde", serde(rename = "etag"))]
    pub fingerprint: String,
    /// Content length in bytes.
    pub size: u64,
}
impl AssetFile {
    pub fn new(id: impl Into<String>, fingerprint: impl Into<String>, size: u64) -> Self {
        Self {
            id: id.into(),
            fingerprint: fingerprint.into(),
            size,
        }
    }
}

/// Everything that can be learnt about an asset from its detail page alone.
///
/// Files are only known by id at this point; their size and fingerprint
/// require a request per file. Combine with those to make an [`Asset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    pub id: String,
    /// Username (URL slug) of the submitter, `None` if the submitter has no
    /// profile link.
    pub author: Option<String>,
    /// Display name of the submitter.
    pub author_name: Option<String>,
    pub kind: AssetType,
    /// Licenses in page order, without duplicates.
    pub licenses: Vec<LicenseType>,
    pub tags: Vec<String>,
    pub favorites: u64,
    /// File ids in the order they are referenced on the page.
    pub file_ids: Vec<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub attribution: Option<String>,
    /// Ids of the collections this asset belongs to.
    pub collections: Vec<String>,
}
impl AssetRecord {
    /// Completes the record with file details.
    ///
    /// `files` is expected in the same order as [`file_ids`](Self::file_ids).
    pub fn into_asset(self, files: Vec<AssetFile>) -> Asset {
        Asset {
            id: self.id,
            author: self.author,
            author_name: self.author_name,
            kind: self.kind,
            licenses: self.licenses,
            tags: self.tags,
            favorites: self.favorites,
            files,
            name: self.name,
            description: self.description,
            attribution: self.attribution,
            collections: self.collections,
        }
    }
}

/// A single game-art submission.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Asset {
    /// Catalog-wide unique, URL-safe identifier (the detail page slug).
    pub id: String,
    pub author: Option<String>,
    pub author_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: AssetType,
    pub licenses: Vec<LicenseType>,
    pub tags: Vec<String>,
    pub favorites: u64,
    /// Files in the order they are referenced on the detail page.
    pub files: Vec<AssetFile>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub attribution: Option<String>,
    pub collections: Vec<String>,
}
impl Asset {
    /// Total size, in bytes, of every file in the asset.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|file| file.size).sum()
    }
}
