use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

/// Path prefix of every downloadable file on the catalog.
pub const FILES_PREFIX: &str = "/sites/default/files/";
/// Path prefix of asset (and collection) detail pages.
pub const CONTENT_PREFIX: &str = "/content/";
/// Path prefix of user profile pages.
pub(crate) const USERS_PREFIX: &str = "/users/";

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Asset detail page, required sections.
selector!(AUTHOR_SECTION_SELECTOR, ".field-name-author-submitter");
selector!(TYPE_SECTION_SELECTOR, ".field-name-field-art-type");
selector!(LICENSES_SECTION_SELECTOR, ".field-name-field-art-licenses");
selector!(TAGS_SECTION_SELECTOR, ".field-name-field-art-tags");
selector!(FAVORITES_SECTION_SELECTOR, ".field-name-favorites");
selector!(FILES_SECTION_SELECTOR, ".field-name-field-art-files");
// Asset detail page, within sections.
selector!(ANCHOR_SELECTOR, "a");
selector!(LICENSE_NAME_SELECTOR, ".license-name");
selector!(FIELD_ITEM_SELECTOR, ".field-item");
selector!(FILE_SELECTOR, ".file");
// Asset detail page, optional sections.
selector!(TITLE_SELECTOR, "div[property=\"dc:title\"] h2");
selector!(DESCRIPTION_SELECTOR, ".right-column div[property=\"content:encoded\"]");
selector!(ATTRIBUTION_SELECTOR, ".field-name-field-art-attribution .field-items");
selector!(COLLECTION_SELECTOR, ".collect-container a");
// Search results.
selector!(RESULTS_SELECTOR, ".view-display-id-search_art_advanced");
selector!(RESULT_TITLE_SELECTOR, "span.art-preview-title a");
selector!(PAGER_LAST_SELECTOR, ".pager-last");
regex!(PAGE_REGEX, r"[?&]page=(\d+)");
