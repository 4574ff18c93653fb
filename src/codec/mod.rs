//! Purpose: Convert between blueprint documents and blueprint strings.
//! Exports: `encode`, `encode_with`, `decode`, `EncodeOptions`, plus the version table.
//! Role: Pure pipeline of four stages: preamble, base64 transport, zlib, JSON.
//! Invariants: Encode runs serialize -> deflate -> base64 -> marker; decode runs the reverse.
//! Invariants: Each call is stateless; the first failing stage is returned as-is.
//! Invariants: The codec never logs or touches the filesystem.
//!
//! ```
//! use serde_json::json;
//!
//! let doc = json!({"a": 1, "b": [2, 3]});
//! let text = bpcodec::encode(&doc).unwrap();
//! assert!(text.starts_with('0'));
//! assert_eq!(bpcodec::decode(&text).unwrap(), doc);
//! ```

pub mod compress;
pub mod preamble;
pub mod serial;
pub mod transport;
pub mod version;

use serde_json::Value;

use crate::core::error::Error;

pub use compress::{DEFAULT_LEVEL, MAX_LEVEL};
pub use version::{CURRENT, Compression, Transport, VERSIONS, Version};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EncodeOptions {
    pub version: Version,
    /// zlib level, 0-9.
    pub level: u32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            version: CURRENT,
            level: DEFAULT_LEVEL,
        }
    }
}

impl EncodeOptions {
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }
}

pub fn encode(document: &Value) -> Result<String, Error> {
    encode_with(document, &EncodeOptions::default())
}

pub fn encode_with(document: &Value, options: &EncodeOptions) -> Result<String, Error> {
    serial::ensure_object(document)?;
    let json = serial::to_json_bytes(document)?;
    let deflated = compress::deflate(options.version.compression, &json, options.level)?;
    let body = transport::encode(options.version.transport, &deflated);
    Ok(preamble::add(options.version.marker, &body))
}

pub fn decode(blueprint: &str) -> Result<Value, Error> {
    let (version, body) = preamble::split(blueprint)?;
    let deflated = transport::decode(version.transport, body)?;
    let json = compress::inflate(version.compression, &deflated)?;
    serial::from_json_bytes(&json)
}

#[cfg(test)]
mod tests {
    use super::{EncodeOptions, decode, encode, encode_with};
    use crate::codec::{compress, transport};
    use crate::codec::version::{Compression, Transport};
    use crate::core::error::ErrorKind;
    use serde_json::json;

    fn wrap(payload: &[u8]) -> String {
        format!("0{}", transport::encode(Transport::Base64Standard, payload))
    }

    #[test]
    fn encode_then_decode_returns_document() {
        let doc = json!({"a": 1, "b": [2, 3]});
        let text = encode(&doc).expect("encode");
        assert!(text.starts_with('0'));
        assert_eq!(decode(&text).expect("decode"), doc);
    }

    #[test]
    fn decode_encode_decode_is_stable() {
        let doc = json!({
            "blueprint": {
                "icons": [{"signal": {"type": "item", "name": "transport-belt"}, "index": 1}],
                "entities": [{"entity_number": 1, "name": "transport-belt", "position": {"x": 0.5, "y": -1.5}}],
                "label": "Belt \u{2192} loop",
                "version": 281479275675648u64
            }
        });
        let once = decode(&encode(&doc).expect("encode")).expect("decode");
        let twice = decode(&encode(&once).expect("encode")).expect("decode");
        assert_eq!(twice, doc);
    }

    #[test]
    fn decodes_known_blueprint_string() {
        // zlib level 9 of {"a":1}, as produced by the reference zlib.
        assert_eq!(
            decode("0eNqrVkpUsjKsBQAIKgIJ").expect("decode"),
            json!({"a": 1})
        );
    }

    #[test]
    fn rejects_non_object_documents_before_any_work() {
        for doc in [json!([1, 2, 3]), json!("scalar")] {
            let err = encode(&doc).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidDocument);
        }
        // Document check wins over option validation.
        let err = encode_with(&json!([]), &EncodeOptions::default().with_level(99)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDocument);
    }

    #[test]
    fn rejects_missing_or_unknown_marker() {
        for text in ["", "1SGVsbG8=", "eNqrVkpUslIyVNJRSgJiIyMlHaUkADpeBE0="] {
            let err = decode(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidFormat, "input {text:?}");
        }
    }

    #[test]
    fn rejects_malformed_base64() {
        let err = decode("0not-valid-base64!!").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decoding);
    }

    #[test]
    fn rejects_corrupt_compressed_payload() {
        let err = decode(&wrap(b"not deflate data")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decompression);

        let err = decode("0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decompression);
    }

    #[test]
    fn rejects_payload_that_is_not_json() {
        let deflated = compress::deflate(Compression::Zlib, b"{not json", 6).expect("deflate");
        let err = decode(&wrap(&deflated)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn decode_accepts_any_compression_level() {
        let doc = json!({"label": "x".repeat(300)});
        for level in [0, 1, 6, 9] {
            let text = encode_with(&doc, &EncodeOptions::default().with_level(level)).expect("encode");
            assert_eq!(decode(&text).expect("decode"), doc, "level {level}");
        }
    }

    #[test]
    fn preserves_key_order() {
        let doc = json!({"zeta": 1, "alpha": 2, "mid": {"y": 1, "x": 2}});
        let decoded = decode(&encode(&doc).expect("encode")).expect("decode");
        let keys: Vec<_> = decoded.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }
}
