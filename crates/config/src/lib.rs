//! Configuration for the catalog client.
//!
//! Values are layered, later sources overriding earlier ones:
//!
//! 1. built-in defaults,
//! 2. the `[oga]` section of an INI file (`~/.oga/config` unless told otherwise),
//! 3. `OGA_URL`, `OGA_MAX_CONNS` and `OGA_ROOT_DIR` environment variables,
//! 4. explicit [`Overrides`] (command-line flags).
//!
//! A missing section or key simply falls through to the layer below, as does
//! a missing file at the default location. A file named explicitly must exist.

pub mod error;
mod file;

use crate::error::{ErrorKind, Result};
use crate::file::IniFile;
use directories::BaseDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_URL: &str = "https://opengameart.org";
pub const DEFAULT_MAX_CONNS: i64 = 5;
pub const DEFAULT_ROOT_DIR: &str = "~/.oga";
/// Name of the INI section the settings are read from.
pub const SECTION: &str = "oga";
const ENV_PREFIX: &str = "OGA_";

/// Settings as they appear in configuration sources, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawConfig {
    url: String,
    max_conns: i64,
    root_dir: String,
}
impl Default for RawConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            max_conns: DEFAULT_MAX_CONNS,
            root_dir: DEFAULT_ROOT_DIR.to_string(),
        }
    }
}

/// Values that take precedence over every other configuration source.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_conns: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<String>,
}

/// Validated client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the catalog.
    pub url: Url,
    /// Maximum number of simultaneous requests to the catalog.
    pub max_conns: usize,
    /// Absolute directory under which manifests and files are stored.
    pub root_dir: PathBuf,
}
impl Config {
    /// Builds a configuration from individual values, applying the same
    /// validation as [`load`](Self::load).
    pub fn new(url: &str, max_conns: i64, root_dir: &str) -> Result<Self> {
        Self::try_from(RawConfig {
            url: url.to_string(),
            max_conns,
            root_dir: root_dir.to_string(),
        })
    }

    /// Default location of the configuration file: `~/.oga/config`.
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().join(".oga").join("config"))
    }

    /// Loads configuration from every source.
    ///
    /// `path` replaces the default configuration file location, and unlike
    /// the default it must exist. Only the `[oga]` section of the file is read.
    ///
    /// # Errors
    ///
    /// [`Load`](ErrorKind::Load) if a source is missing, unreadable or holds
    /// a value of the wrong type, [`Invalid`](ErrorKind::Invalid) if a value is out
    /// of range (such as `max_conns = 0`).
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let file = match path {
            Some(path) => Some(IniFile::file_exact(path, SECTION)),
            None => Self::default_path().map(|path| IniFile::file(path, SECTION)),
        };
        let mut figment = Figment::from(Serialized::defaults(RawConfig::default()));
        if let Some(file) = file {
            tracing::debug!(path = %file.path().display(), "Reading configuration file");
            figment = figment.merge(file);
        }
        let figment = figment
            .merge(Env::prefixed(ENV_PREFIX).global())
            .merge(Serialized::globals(overrides))
            .select(SECTION);
        let raw: RawConfig = figment.extract().or_raise(|| ErrorKind::Load)?;
        Self::try_from(raw)
    }
}
impl TryFrom<RawConfig> for Config {
    type Error = error::Error;
    fn try_from(raw: RawConfig) -> Result<Self> {
        let url = Url::parse(&raw.url).or_raise(|| ErrorKind::Invalid(format!("url is not a valid URL: {}", raw.url)))?;
        if url.cannot_be_a_base() {
            exn::bail!(ErrorKind::Invalid(format!("url cannot be used as a base URL: {url}")));
        }
        let max_conns = usize::try_from(raw.max_conns)
            .ok()
            .filter(|max| *max >= 1)
            .ok_or_raise(|| ErrorKind::Invalid(format!("max_conns must be at least 1, got {}", raw.max_conns)))?;
        let root_dir = expand_home(&raw.root_dir)?;
        let root_dir = std::path::absolute(&root_dir)
            .or_raise(|| ErrorKind::Invalid(format!("root_dir cannot be made absolute: {}", root_dir.display())))?;
        Ok(Self { url, max_conns, root_dir })
    }
}

/// Expands a leading `~` to the current user's home directory.
fn expand_home(path: &str) -> Result<PathBuf> {
    let rest = match path.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with(['/', std::path::MAIN_SEPARATOR]) => &rest[1..],
        // `~user` forms are left alone.
        _ => return Ok(PathBuf::from(path)),
    };
    let dirs = BaseDirs::new().ok_or_raise(|| ErrorKind::Invalid("home directory is unknown".into()))?;
    Ok(dirs.home_dir().join(rest))
}
