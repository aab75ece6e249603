use figment::value::{Dict, Map, Value};
use figment::{Error, Metadata, Profile, Provider, Source};
use ini::Ini;
use std::path::{Path, PathBuf};

/// One section of an INI file, as a figment profile of the same name.
///
/// Values are unquoted text (`url = https://…`) and are parsed the same way
/// as environment variables, so `max_conns = 3` is a number. Other sections
/// are ignored.
pub(crate) struct IniFile {
    path: PathBuf,
    section: &'static str,
    required: bool,
}
impl IniFile {
    /// A file that may be absent.
    pub(crate) fn file(path: impl Into<PathBuf>, section: &'static str) -> Self {
        Self { path: path.into(), section, required: false }
    }

    /// A file that must exist.
    pub(crate) fn file_exact(path: impl Into<PathBuf>, section: &'static str) -> Self {
        Self { required: true, ..Self::file(path, section) }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Provider for IniFile {
    fn metadata(&self) -> Metadata {
        Metadata::from("INI file", Source::File(self.path.clone()))
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        if !self.required && !self.path.exists() {
            return Ok(Map::new());
        }
        let ini = Ini::load_from_file(&self.path).map_err(|err| Error::from(format!("{}: {err}", self.path.display())))?;
        let Some(section) = ini.section(Some(self.section)) else {
            return Ok(Map::new());
        };
        let dict: Dict = section
            .iter()
            .map(|(key, value)| (key.to_string(), value.parse::<Value>().unwrap_or_else(|never| match never {})))
            .collect();
        Ok(Map::from([(Profile::new(self.section), dict)]))
    }
}
