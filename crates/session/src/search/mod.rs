//! Advanced search: validated filters and lazy pagination.

mod filters;
mod paginate;

pub use self::filters::{Order, PAGE_SIZES, SearchFilters, SortBy, TagOperator};
pub use self::paginate::{SearchStream, paginate};
