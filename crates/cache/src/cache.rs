use crate::error::{ErrorKind, Result};
use crate::manifest::{self, Manifest};
use exn::ResultExt;
use oga_storage::error::ErrorKind as StorageErrorKind;
use oga_storage::{BackendHandle, validate_segment};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::instrument;

const MANIFEST_DIR: &str = "cache";
const ASSETS_DIR: &str = "assets";

/// Stores downloaded asset files alongside a manifest of their fingerprints.
///
/// Manifests are read from storage on first use and memoized per asset id;
/// every change rewrites the whole manifest. The memoized state belongs to
/// this instance only: two caches sharing a root will not see each other's
/// changes without a [`reload`](Self::reload).
pub struct FileCache {
    backend: BackendHandle,
    manifests: Mutex<HashMap<String, Manifest>>,
}
impl FileCache {
    pub fn new(backend: BackendHandle) -> Self {
        Self {
            backend,
            manifests: Mutex::new(HashMap::new()),
        }
    }

    fn manifest_path(asset_id: &str) -> Result<PathBuf> {
        let segment = validate_segment(asset_id).or_raise(|| ErrorKind::InvalidId(asset_id.to_string()))?;
        Ok(Path::new(MANIFEST_DIR).join(segment))
    }

    /// Location of a stored file: `assets/<asset_id>/<file_id>`.
    ///
    /// File ids may contain directories, but every `/`-separated part must
    /// be a plain name: no `.`, `..` or empty parts. Each file id therefore
    /// has exactly one location, and no two ids share it.
    pub fn file_path(asset_id: &str, file_id: &str) -> Result<PathBuf> {
        let segment = validate_segment(asset_id).or_raise(|| ErrorKind::InvalidId(asset_id.to_string()))?;
        let mut path = Path::new(ASSETS_DIR).join(segment);
        for part in file_id.split('/') {
            path.push(validate_segment(part).or_raise(|| ErrorKind::InvalidId(file_id.to_string()))?);
        }
        Ok(path)
    }

    /// Reads a manifest from storage, creating an empty one if none exists.
    async fn load(&self, asset_id: &str) -> Result<Manifest> {
        let path = Self::manifest_path(asset_id)?;
        match self.backend.read(&path).await {
            Ok(bytes) => manifest::decode(&bytes),
            Err(err) if matches!(&*err, StorageErrorKind::NotFound(_)) => {
                let manifest = Manifest::new();
                self.persist(asset_id, &manifest).await?;
                Ok(manifest)
            },
            Err(err) => Err(err.raise(ErrorKind::Storage)),
        }
    }

    async fn persist(&self, asset_id: &str, manifest: &Manifest) -> Result<()> {
        let path = Self::manifest_path(asset_id)?;
        let bytes = manifest::encode(manifest)?;
        self.backend.write(&path, &bytes).await.or_raise(|| ErrorKind::Storage)
    }

    /// Memoized manifest for `asset_id`, loaded from storage on first use.
    async fn memoized<'m>(&self, manifests: &'m mut HashMap<String, Manifest>, asset_id: &str) -> Result<&'m mut Manifest> {
        Ok(match manifests.entry(asset_id.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(self.load(asset_id).await?),
        })
    }

    /// Applies `change` to the memoized manifest and writes it back if
    /// `change` returns `true`.
    async fn update<T>(&self, asset_id: &str, change: impl FnOnce(&mut Manifest) -> (bool, T)) -> Result<T> {
        let mut manifests = self.manifests.lock().await;
        let manifest = self.memoized(&mut manifests, asset_id).await?;
        let (changed, value) = change(manifest);
        if changed {
            self.persist(asset_id, manifest).await?;
        }
        Ok(value)
    }

    /// Snapshot of the manifest for `asset_id`.
    pub async fn manifest(&self, asset_id: &str) -> Result<Manifest> {
        self.update(asset_id, |manifest| (false, manifest.clone())).await
    }

    /// Discards the memoized manifest and reads it from storage again.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn reload(&self, asset_id: &str) -> Result<Manifest> {
        let loaded = self.load(asset_id).await?;
        self.manifests.lock().await.insert(asset_id.to_string(), loaded.clone());
        Ok(loaded)
    }

    /// Fingerprint of the stored copy of a file, if there is one.
    ///
    /// A manifest entry whose file has gone missing from storage is cleared
    /// (and the manifest rewritten) rather than reported.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn get_fingerprint(&self, asset_id: &str, file_id: &str) -> Result<Option<String>> {
        let path = Self::file_path(asset_id, file_id)?;
        let mut manifests = self.manifests.lock().await;
        let manifest = self.memoized(&mut manifests, asset_id).await?;
        let Some(Some(fingerprint)) = manifest.get(file_id).cloned() else {
            return Ok(None);
        };
        if self.backend.exists(&path).await.or_raise(|| ErrorKind::Storage)? {
            return Ok(Some(fingerprint));
        }
        tracing::warn!(asset_id, file_id, fingerprint = %fingerprint, "Cached file is missing from storage; forgetting it");
        manifest.insert(file_id.to_string(), None);
        self.persist(asset_id, manifest).await?;
        Ok(None)
    }

    /// Stores `bytes` as the content of a file and records its fingerprint.
    ///
    /// The bytes are written before the manifest, so a manifest entry never
    /// points at a file that was not fully written.
    #[instrument(skip(self, bytes), fields(backend = self.backend.name(), size = bytes.len()))]
    pub async fn save(&self, asset_id: &str, file_id: &str, fingerprint: &str, bytes: &[u8]) -> Result<()> {
        let path = Self::file_path(asset_id, file_id)?;
        self.backend.write(&path, bytes).await.or_raise(|| ErrorKind::Storage)?;
        self.update(asset_id, |manifest| {
            manifest.insert(file_id.to_string(), Some(fingerprint.to_string()));
            (true, ())
        })
        .await
    }

    /// Removes the stored copy of a file (if any) and clears its entry.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn delete(&self, asset_id: &str, file_id: &str) -> Result<()> {
        let path = Self::file_path(asset_id, file_id)?;
        match self.backend.delete(&path).await {
            Ok(()) => {},
            Err(err) if matches!(&*err, StorageErrorKind::NotFound(_)) => {},
            Err(err) => return Err(err.raise(ErrorKind::Storage)),
        }
        self.update(asset_id, |manifest| {
            manifest.insert(file_id.to_string(), None);
            (true, ())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oga_storage::StorageBackend;
    use oga_storage::backend::{LocalBackend, MockBackend};
    use rstest::rstest;
    use std::sync::Arc;

    fn mock_cache() -> (Arc<MockBackend>, FileCache) {
        let backend = Arc::new(MockBackend::default());
        let cache = FileCache::new(backend.clone());
        (backend, cache)
    }

    #[tokio::test]
    async fn test_fingerprint_round_trip() {
        let (_, cache) = mock_cache();
        assert_eq!(cache.get_fingerprint("x", "a.png").await.unwrap(), None);
        cache.save("x", "a.png", "abc", b"png bytes").await.unwrap();
        assert_eq!(cache.get_fingerprint("x", "a.png").await.unwrap(), Some("abc".to_string()));
    }

    #[tokio::test]
    async fn test_first_read_creates_empty_manifest() {
        let (backend, cache) = mock_cache();
        assert!(cache.manifest("x").await.unwrap().is_empty());
        assert_eq!(backend.read(Path::new("cache/x")).await.unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_save_writes_bytes_and_manifest() {
        let (backend, cache) = mock_cache();
        cache.save("x", "sub/b.ogg", "def", b"ogg bytes").await.unwrap();
        assert_eq!(backend.read(Path::new("assets/x/sub/b.ogg")).await.unwrap(), b"ogg bytes");
        let manifest = manifest::decode(&backend.read(Path::new("cache/x")).await.unwrap()).unwrap();
        assert_eq!(manifest, Manifest::from([("sub/b.ogg".to_string(), Some("def".to_string()))]));
    }

    #[tokio::test]
    async fn test_save_rejects_aliased_file_id() {
        let (backend, cache) = mock_cache();
        cache.save("x", "a.png", "abc", b"png bytes").await.unwrap();
        let err = cache.save("x", "dir/../a.png", "def", b"other bytes").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidId(id) if id == "dir/../a.png"));
        assert_eq!(backend.read(Path::new("assets/x/a.png")).await.unwrap(), b"png bytes");
        assert_eq!(cache.manifest("x").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_self_healing_on_local_storage() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(LocalBackend::new("local", temp_dir.path()).unwrap());
        let cache = FileCache::new(backend);
        cache.save("x", "a.png", "abc", b"png bytes").await.unwrap();
        std::fs::remove_file(temp_dir.path().join("assets/x/a.png")).unwrap();

        assert_eq!(cache.get_fingerprint("x", "a.png").await.unwrap(), None);
        let on_disk = std::fs::read(temp_dir.path().join("cache/x")).unwrap();
        assert_eq!(manifest::decode(&on_disk).unwrap(), Manifest::from([("a.png".to_string(), None)]));
    }

    #[tokio::test]
    async fn test_delete() {
        let (backend, cache) = mock_cache();
        cache.save("x", "a.png", "abc", b"png bytes").await.unwrap();
        cache.delete("x", "a.png").await.unwrap();
        assert!(!backend.exists(Path::new("assets/x/a.png")).await.unwrap());
        assert_eq!(cache.get_fingerprint("x", "a.png").await.unwrap(), None);
        // Deleting something that was never stored is fine.
        cache.delete("x", "never.png").await.unwrap();
        assert_eq!(cache.manifest("x").await.unwrap().get("never.png"), Some(&None));
    }

    #[tokio::test]
    async fn test_reload_sees_external_changes() {
        let (backend, cache) = mock_cache();
        cache.save("x", "a.png", "abc", b"png bytes").await.unwrap();
        backend.write(Path::new("cache/x"), br#"{"a.png": "changed"}"#).await.unwrap();
        // Memoized until reloaded.
        assert_eq!(cache.get_fingerprint("x", "a.png").await.unwrap(), Some("abc".to_string()));
        cache.reload("x").await.unwrap();
        assert_eq!(cache.get_fingerprint("x", "a.png").await.unwrap(), Some("changed".to_string()));
    }

    #[tokio::test]
    async fn test_corrupt_manifest() {
        let backend = Arc::new(MockBackend::with_files([("cache/x", b"not json".to_vec())]));
        let cache = FileCache::new(backend);
        let err = cache.manifest("x").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidData(_)));
    }

    #[rstest]
    #[case("x", "a.png", Some("assets/x/a.png"))]
    #[case("x", "dir/a.png", Some("assets/x/dir/a.png"))]
    #[case("x", "dir/../a.png", None)]
    #[case("x", "./a.png", None)]
    #[case("x", "dir//a.png", None)]
    #[case("x", "dir/", None)]
    #[case("x", "/a.png", None)]
    #[case("x", "../y/a.png", None)]
    #[case("x", "..", None)]
    #[case("x", "", None)]
    #[case("../x", "a.png", None)]
    #[case("x/y", "a.png", None)]
    fn test_file_path(#[case] asset_id: &str, #[case] file_id: &str, #[case] expected: Option<&str>) {
        let result = FileCache::file_path(asset_id, file_id);
        match expected {
            Some(expected) => assert_eq!(result.unwrap(), Path::new(expected)),
            None => assert!(matches!(&*result.unwrap_err(), ErrorKind::InvalidId(_))),
        }
    }
}
