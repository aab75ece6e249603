use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::sanitize;
use crate::error::{Error, ErrorKind};

/// License an asset is offered under.
///
/// An asset may be dual (or more) licensed, see [`Asset::licenses`](crate::models::Asset::licenses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(into = "&'static str"))]
pub enum LicenseType {
    CcBy40,
    CcBy30,
    CcBySa40,
    CcBySa30,
    Gpl30,
    Gpl20,
    OgaBy30,
    Cc0,
    Lgpl30,
    Lgpl21,
}
impl LicenseType {
    pub const ALL: [LicenseType; 10] = [
        Self::CcBy40,
        Self::CcBy30,
        Self::CcBySa40,
        Self::CcBySa30,
        Self::Gpl30,
        Self::Gpl20,
        Self::OgaBy30,
        Self::Cc0,
        Self::Lgpl30,
        Self::Lgpl21,
    ];

    /// Returns the label the catalog displays for this license.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CcBy40 => "CC-BY 4.0",
            Self::CcBy30 => "CC-BY 3.0",
            Self::CcBySa40 => "CC-BY-SA 4.0",
            Self::CcBySa30 => "CC-BY-SA 3.0",
            Self::Gpl30 => "GPL 3.0",
            Self::Gpl20 => "GPL 2.0",
            Self::OgaBy30 => "OGA-BY 3.0",
            Self::Cc0 => "CC0",
            Self::Lgpl30 => "LGPL 3.0",
            Self::Lgpl21 => "LGPL 2.1",
        }
    }

    /// Returns the short name used on the command-line.
    pub fn as_short_str(&self) -> &'static str {
        match self {
            Self::CcBy40 => "cc-by-40",
            Self::CcBy30 => "cc-by-30",
            Self::CcBySa40 => "cc-by-sa-40",
            Self::CcBySa30 => "cc-by-sa-30",
            Self::Gpl30 => "gpl-30",
            Self::Gpl20 => "gpl-20",
            Self::OgaBy30 => "oga-by-30",
            Self::Cc0 => "cc0",
            Self::Lgpl30 => "lgpl-30",
            Self::Lgpl21 => "lgpl-21",
        }
    }

    /// Returns the taxonomy id the catalog's search form uses to filter by
    /// this license.
    pub fn search_code(&self) -> &'static str {
        match self {
            Self::CcBy40 => "17981",
            Self::CcBy30 => "2",
            Self::CcBySa40 => "17982",
            Self::CcBySa30 => "3",
            Self::Gpl30 => "6",
            Self::Gpl20 => "5",
            Self::OgaBy30 => "10310",
            Self::Cc0 => "4",
            Self::Lgpl30 => "8",
            Self::Lgpl21 => "7",
        }
    }
}
impl FromStr for LicenseType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match sanitize(s).as_str() {
            "ccby40" => Self::CcBy40,
            "ccby30" => Self::CcBy30,
            "ccbysa40" => Self::CcBySa40,
            "ccbysa30" => Self::CcBySa30,
            "gpl30" | "gpl3" => Self::Gpl30,
            "gpl20" | "gpl2" => Self::Gpl20,
            "ogaby30" => Self::OgaBy30,
            "cc0" => Self::Cc0,
            "lgpl30" | "lgpl3" => Self::Lgpl30,
            "lgpl21" => Self::Lgpl21,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "license",
                value: format!("unknown license: {}", s)
            }),
        })
    }
}
impl TryFrom<String> for LicenseType {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}
impl From<LicenseType> for &'static str {
    fn from(value: LicenseType) -> Self {
        value.as_str()
    }
}
impl Display for LicenseType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
