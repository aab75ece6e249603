//! Synchronous access to a [`Session`].

use crate::download::Download;
use crate::error::{ErrorKind, Result};
use crate::search::SearchFilters;
use crate::session::Session;
use exn::ResultExt;
use futures::TryStreamExt;
use oga_config::Config;
use oga_extract::models::{Asset, AssetFile};
use tokio::runtime::{Builder, Runtime};

/// A [`Session`] driven by its own single-threaded runtime.
///
/// Each method blocks until the operation has completed. Must not be used
/// from within an async context.
pub struct BlockingSession {
    runtime: Runtime,
    session: Session,
}
impl BlockingSession {
    pub fn new(config: Config) -> Result<Self> {
        Self::from_session(Session::new(config)?)
    }

    pub fn from_session(session: Session) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build().or_raise(|| ErrorKind::Runtime)?;
        Ok(Self { runtime, session })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Every matching asset id, after all pages have been fetched.
    pub fn search(&self, filters: &SearchFilters) -> Result<Vec<String>> {
        let stream = self.session.search(filters)?;
        self.runtime.block_on(stream.try_collect())
    }

    pub fn describe_asset(&self, id: &str) -> Result<Asset> {
        self.runtime.block_on(self.session.describe_asset(id))
    }

    pub fn describe_asset_file(&self, file_id: &str) -> Result<AssetFile> {
        self.runtime.block_on(self.session.describe_asset_file(file_id))
    }

    pub fn download_asset(&self, asset: &Asset) -> Result<()> {
        self.runtime.block_on(self.session.download_asset(asset))
    }

    pub fn download_asset_file(&self, asset_id: &str, file: &AssetFile) -> Result<Download> {
        self.runtime.block_on(self.session.download_asset_file(asset_id, file))
    }
}
