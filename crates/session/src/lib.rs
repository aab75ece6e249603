//! Client for the OpenGameArt.org catalog.
//!
//! A [`Session`] searches the catalog, describes assets (their detail page
//! plus the size and fingerprint of every file), and downloads asset files
//! into a local [`FileCache`](oga_cache::FileCache), skipping files whose
//! stored fingerprint is still current.
//!
//! All network access goes through a [`Transport`](transport::Transport)
//! with a hard cap on concurrent requests. [`BlockingSession`] wraps a
//! session with its own runtime for synchronous callers.

mod blocking;
mod describe;
mod download;
pub mod endpoints;
pub mod error;
#[cfg(test)]
mod fixtures;
pub mod search;
mod session;
pub mod transport;

pub use crate::blocking::BlockingSession;
pub use crate::download::Download;
pub use crate::search::{SearchFilters, SearchStream};
pub use crate::session::Session;
pub use oga_config::Config;
