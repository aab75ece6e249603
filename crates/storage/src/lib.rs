pub mod backend;
pub mod error;
mod path;

pub use crate::backend::StorageBackend;
pub use crate::path::validate_segment;
use std::sync::Arc;

pub type BackendHandle = Arc<dyn StorageBackend + Send + Sync>;
