//! Local cache of downloaded asset files.
//!
//! Files are stored through a [`StorageBackend`](oga_storage::StorageBackend)
//! at `assets/<asset_id>/<file_id>`. Next to them, each asset has a manifest
//! at `cache/<asset_id>` mapping file ids to the fingerprint (entity tag) the
//! catalog reported when the file was downloaded. A file is only considered
//! cached if its manifest entry equals the catalog's current fingerprint.
//!
//! The manifests are not the source of truth for what is on disk: an entry
//! pointing at a missing file is cleared the next time it is looked up.

mod cache;
pub mod error;
mod manifest;

pub use crate::cache::FileCache;
pub use crate::manifest::Manifest;
