use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::sanitize;
use crate::error::{Error, ErrorKind};

/// Kind of art an asset was submitted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(into = "&'static str"))]
pub enum AssetType {
    Art2D,
    Art3D,
    ConceptArt,
    Texture,
    Music,
    SoundEffect,
    Document,
}
impl AssetType {
    pub const ALL: [AssetType; 7] = [
        Self::Art2D,
        Self::Art3D,
        Self::ConceptArt,
        Self::Texture,
        Self::Music,
        Self::SoundEffect,
        Self::Document,
    ];

    /// Returns the label the catalog displays for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Art2D => "2D Art",
            Self::Art3D => "3D Art",
            Self::ConceptArt => "Concept Art",
            Self::Texture => "Texture",
            Self::Music => "Music",
            Self::SoundEffect => "Sound Effect",
            Self::Document => "Document",
        }
    }

    /// Returns the short name used on the command-line.
    pub fn as_short_str(&self) -> &'static str {
        match self {
            Self::Art2D => "2d",
            Self::Art3D => "3d",
            Self::ConceptArt => "concept",
            Self::Texture => "texture",
            Self::Music => "music",
            Self::SoundEffect => "sfx",
            Self::Document => "doc",
        }
    }

    /// Returns the taxonomy id the catalog's search form uses to filter by
    /// this type.
    pub fn search_code(&self) -> &'static str {
        match self {
            Self::Art2D => "9",
            Self::Art3D => "10",
            Self::ConceptArt => "7273",
            Self::Texture => "14",
            Self::Music => "12",
            Self::SoundEffect => "13",
            Self::Document => "11",
        }
    }
}
impl FromStr for AssetType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match sanitize(s).as_str() {
            "2dart" | "2d" | "art2d" => Self::Art2D,
            "3dart" | "3d" | "art3d" => Self::Art3D,
            "conceptart" | "concept" => Self::ConceptArt,
            "texture" => Self::Texture,
            "music" => Self::Music,
            "soundeffect" | "sfx" => Self::SoundEffect,
            "document" | "doc" => Self::Document,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "type",
                value: format!("unknown asset type: {}", s)
            }),
        })
    }
}
impl TryFrom<String> for AssetType {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}
impl From<AssetType> for &'static str {
    fn from(value: AssetType) -> Self {
        value.as_str()
    }
}
impl Display for AssetType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
