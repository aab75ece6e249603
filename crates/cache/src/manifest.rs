use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::collections::BTreeMap;

/// Per-asset record of which files are stored, and at which fingerprint.
///
/// A `None` fingerprint means the file was known once but is no longer
/// stored. Keys are sorted, so the serialized form is stable.
pub type Manifest = BTreeMap<String, Option<String>>;

const INDENT: &[u8] = b"    ";

pub(crate) fn decode(bytes: &[u8]) -> Result<Manifest> {
    serde_json::from_slice(bytes).or_raise(|| ErrorKind::InvalidData("manifest is not a JSON object of fingerprints".into()))
}

pub(crate) fn encode(manifest: &Manifest) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    manifest
        .serialize(&mut serializer)
        .or_raise(|| ErrorKind::InvalidData("manifest could not be serialized".into()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_encode_is_sorted_and_indented() {
        let manifest = Manifest::from([
            ("b.ogg".to_string(), Some("def".to_string())),
            ("a.png".to_string(), Some("abc".to_string())),
            ("c.wav".to_string(), None),
        ]);
        let encoded = String::from_utf8(encode(&manifest).unwrap()).unwrap();
        assert_eq!(encoded, "{\n    \"a.png\": \"abc\",\n    \"b.ogg\": \"def\",\n    \"c.wav\": null\n}");
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&Manifest::new()).unwrap(), b"{}");
    }

    #[rstest]
    #[case(b"[]")]
    #[case(b"{\"a.png\": 5}")]
    #[case(b"not json")]
    fn test_decode_invalid(#[case] bytes: &[u8]) {
        let err = decode(bytes).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidData(_)));
    }

    #[test]
    fn test_decode() {
        let manifest = decode(br#"{"a.png": "abc", "b.ogg": null}"#).unwrap();
        assert_eq!(manifest.get("a.png"), Some(&Some("abc".to_string())));
        assert_eq!(manifest.get("b.ogg"), Some(&None));
    }
}
