//! Path validation and security utilities.
//!
//! Identifiers scraped from the catalog end up as file names under the
//! storage root; these functions make sure they can never point outside it.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates a storage path for security and correctness.
/// Ensures that paths don't escape the storage root (no `..` traversal).
///
/// > **Note:** This does **not** normalize backslashes, non-UTF8 bytes, or
/// >           platform-specific weirdness. Null bytes are explicitly rejected.
///
/// # Returns
/// Returns the normalized path if valid, or [`InvalidPath`](crate::error::ErrorKind::InvalidPath)
/// if invalid.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use oga_storage::validate_path;
/// // Valid paths
/// assert!(validate_path("assets/imminent-threat/a.png").is_ok());
/// assert!(validate_path("assets/x/sub/dir/b.ogg").is_ok());
/// assert!(validate_path("a/../file.png").is_ok()); // (never leaves storage root)
/// // Invalid paths
/// assert!(validate_path("../etc/passwd").is_err());
/// assert!(validate_path("a/../../b").is_err()); // (leaves storage root)
/// assert!(validate_path("a\0b").is_err());
/// // Paths get resolved
/// assert_eq!(
///     validate_path("wrong/../still-wrong/.././correct//./path.png/").unwrap(),
///     Path::new("correct/path.png")
/// );
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    // Path::components() handles non-UTF8 and repeated separators for us.
    let mut components = Vec::new();
    for component in path.as_ref().components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but cause
                // truncation in C-based syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
        false => Ok(components.into_iter().collect()),
    }
}

/// Validates that `segment` names exactly one entry within a directory.
///
/// Stricter than [`validate`]: separators, `.` and `..` are all rejected
/// rather than resolved, so the segment is usable as a directory or file
/// name on its own.
///
/// ```
/// use oga_storage::validate_segment;
/// assert!(validate_segment("imminent-threat").is_ok());
/// assert!(validate_segment("a/b").is_err());
/// assert!(validate_segment("..").is_err());
/// ```
pub fn validate_segment(segment: &str) -> Result<&str> {
    let mut components = Path::new(segment).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(s)), None) if s == segment && !segment.contains('\0') => Ok(segment),
        _ => exn::bail!(ErrorKind::InvalidPath(PathBuf::from(segment))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("cache/imminent-threat", "cache/imminent-threat")]
    #[case("assets/x/audio_preview/threat_loop.mp3", "assets/x/audio_preview/threat_loop.mp3")]
    #[case("assets//x//a.png", "assets/x/a.png")]
    #[case("assets/./x/./a.png", "assets/x/a.png")]
    #[case("assets/x/", "assets/x")]
    #[case("/assets/x/a.png", "assets/x/a.png")]
    #[case("assets/x/sub/..", "assets/x")]
    fn test_resolved_paths(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate(input).unwrap(), Path::new(expected));
    }

    #[rstest]
    // Escapes the root.
    #[case("..")]
    #[case("../../etc/passwd")]
    #[case("assets/../../outside")]
    // Names nothing.
    #[case("")]
    #[case(".")]
    #[case("./.")]
    #[case("//")]
    #[case("assets/..")]
    // Truncated by the OS.
    #[case("assets/x/a\0.png")]
    fn test_rejected_paths(#[case] input: &str) {
        assert!(matches!(&*validate(input).unwrap_err(), ErrorKind::InvalidPath(path) if path == Path::new(input)));
    }

    #[rstest]
    #[case("imminent-threat")]
    #[case("lpc_base_assets")]
    #[case("file.with.dots")]
    fn test_valid_segments(#[case] segment: &str) {
        assert_eq!(validate_segment(segment).unwrap(), segment);
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("a/b")]
    #[case("/abs")]
    #[case("trailing/")]
    #[case("nul\0byte")]
    fn test_invalid_segments(#[case] segment: &str) {
        assert!(validate_segment(segment).is_err());
    }
}
