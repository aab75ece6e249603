use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};
use exn::ResultExt;
use oga_extract::models::{AssetType, LicenseType};

/// Page sizes the catalog's search form accepts.
pub const PAGE_SIZES: [u32; 6] = [24, 48, 72, 96, 120, 144];

fn invalid(what: &str, value: &str, allowed: &[&str]) -> Error {
    Error::from(ErrorKind::Validation(format!(
        "invalid {what} \"{value}\", expected one of: {}",
        allowed.join(", ")
    )))
}

/// Declares a closed set of choices, each with a user-facing name (accepted
/// by `FromStr`) and the value the catalog expects in the query string.
macro_rules! choice {
    ($(#[$meta:meta])* $name:ident, $what:literal, default = $default:ident, { $($variant:ident => ($user:literal, $origin:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }
        impl $name {
            pub const ALL: &[$name] = &[$(Self::$variant),+];

            /// Name accepted from (and shown to) users.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $user,)+
                }
            }

            /// Value sent to the catalog.
            pub fn origin_code(&self) -> &'static str {
                match self {
                    $(Self::$variant => $origin,)+
                }
            }
        }
        impl FromStr for $name {
            type Err = Error;
            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_lowercase().as_str() {
                    $($user => Ok(Self::$variant),)+
                    _ => Err(invalid($what, s, &[$($user),+])),
                }
            }
        }
        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                f.write_str(self.as_str())
            }
        }
        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }
    };
}

choice!(
    /// Field search results are ordered by.
    SortBy, "sort key", default = Favorites, {
        Favorites => ("favorites", "count"),
        Created => ("created", "created"),
        Views => ("views", "totalcount"),
    }
);

choice!(
    /// Direction of the ordering.
    Order, "sort order", default = Descending, {
        Ascending => ("ascending", "ASC"),
        Descending => ("descending", "DESC"),
    }
);

choice!(
    /// How the tags of a search are combined.
    TagOperator, "tag operator", default = Or, {
        Or => ("or", "or"),
        And => ("and", "and"),
        Not => ("not", "not"),
        Empty => ("empty", "empty"),
        NotEmpty => ("not-empty", "not empty"),
    }
);

/// Parameters of an advanced search.
///
/// Every value is checked as it is set, so a `SearchFilters` always maps to
/// a query the catalog accepts.
///
/// ```
/// use oga_session::search::{SearchFilters, SortBy};
///
/// let filters = SearchFilters::default()
///     .with_keys("battle")
///     .with_sort_by("views".parse().unwrap())
///     .with_type_named("music").unwrap()
///     .with_page_limit(2).unwrap();
/// assert_eq!(filters.sort_by(), SortBy::Views);
/// assert!(SearchFilters::default().with_page_size(25).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilters {
    keys: String,
    title: String,
    submitter: String,
    sort_by: SortBy,
    order: Order,
    types: Vec<AssetType>,
    licenses: Vec<LicenseType>,
    tags: Vec<String>,
    tag_operator: TagOperator,
    page_size: u32,
    page_limit: Option<u32>,
}
impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            keys: String::new(),
            title: String::new(),
            submitter: String::new(),
            sort_by: SortBy::default(),
            order: Order::default(),
            types: Vec::new(),
            licenses: Vec::new(),
            tags: Vec::new(),
            tag_operator: TagOperator::default(),
            page_size: PAGE_SIZES[0],
            page_limit: None,
        }
    }
}
impl SearchFilters {
    /// Free-text search over the whole asset.
    pub fn with_keys(mut self, keys: impl Into<String>) -> Self {
        self.keys = keys.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Username of the submitter.
    pub fn with_submitter(mut self, submitter: impl Into<String>) -> Self {
        self.submitter = submitter.into();
        self
    }

    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// Restrict results to `kind`; may be given more than once.
    pub fn with_type(mut self, kind: AssetType) -> Self {
        if !self.types.contains(&kind) {
            self.types.push(kind);
        }
        self
    }

    /// Like [`with_type`](Self::with_type), parsing the type's label or short name.
    pub fn with_type_named(self, name: &str) -> Result<Self> {
        let allowed: Vec<_> = AssetType::ALL.iter().map(AssetType::as_short_str).collect();
        let kind = name.parse::<AssetType>().or_raise(|| {
            ErrorKind::Validation(format!("invalid type \"{name}\", expected one of: {}", allowed.join(", ")))
        })?;
        Ok(self.with_type(kind))
    }

    /// Restrict results to `license`; may be given more than once.
    pub fn with_license(mut self, license: LicenseType) -> Self {
        if !self.licenses.contains(&license) {
            self.licenses.push(license);
        }
        self
    }

    /// Like [`with_license`](Self::with_license), parsing the license's label or short name.
    pub fn with_license_named(self, name: &str) -> Result<Self> {
        let allowed: Vec<_> = LicenseType::ALL.iter().map(LicenseType::as_short_str).collect();
        let license = name.parse::<LicenseType>().or_raise(|| {
            ErrorKind::Validation(format!("invalid license \"{name}\", expected one of: {}", allowed.join(", ")))
        })?;
        Ok(self.with_license(license))
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_tag_operator(mut self, tag_operator: TagOperator) -> Self {
        self.tag_operator = tag_operator;
        self
    }

    /// Number of results per page; one of [`PAGE_SIZES`].
    pub fn with_page_size(mut self, page_size: u32) -> Result<Self> {
        if !PAGE_SIZES.contains(&page_size) {
            let allowed: Vec<_> = PAGE_SIZES.iter().map(u32::to_string).collect();
            exn::bail!(ErrorKind::Validation(format!(
                "invalid page size {page_size}, expected one of: {}",
                allowed.join(", ")
            )));
        }
        self.page_size = page_size;
        Ok(self)
    }

    /// Stop after fetching `page_limit` pages of results.
    pub fn with_page_limit(mut self, page_limit: u32) -> Result<Self> {
        if page_limit == 0 {
            exn::bail!(ErrorKind::Validation("page limit must be at least 1".into()));
        }
        self.page_limit = Some(page_limit);
        Ok(self)
    }

    pub fn keys(&self) -> &str {
        &self.keys
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn submitter(&self) -> &str {
        &self.submitter
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn types(&self) -> &[AssetType] {
        &self.types
    }

    pub fn licenses(&self) -> &[LicenseType] {
        &self.licenses
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn tag_operator(&self) -> TagOperator {
        self.tag_operator
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn page_limit(&self) -> Option<u32> {
        self.page_limit
    }
}
