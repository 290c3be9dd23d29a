//! Cache Value Module
//!
//! The primitive value kinds the cache accepts, their raw-byte encoding,
//! and the tagged serialization used for call-history records.

use std::fmt;

use serde::{Deserialize, Serialize};

// == Value ==
/// A primitive value accepted by the cache store.
///
/// Values travel to the backing store as raw bytes (strings as UTF-8,
/// numbers as decimal text, byte sequences verbatim) and into history
/// records as tagged JSON, so a recorded value always reads back as the
/// kind it was stored as.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// UTF-8 text
    Str(String),
    /// Opaque byte sequence
    Bytes(Vec<u8>),
    /// Signed integer
    Int(i64),
    /// Floating-point number
    Float(f64),
}

impl Value {
    // == Raw Encoding ==
    /// Raw-byte encoding written to the backing store.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Value::Str(text) => text.clone().into_bytes(),
            Value::Bytes(data) => data.clone(),
            Value::Int(n) => n.to_string().into_bytes(),
            Value::Float(x) => x.to_string().into_bytes(),
        }
    }
}

// == Conversions ==
impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Str(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Str(text)
    }
}

impl From<Vec<u8>> for Value {
    fn from(data: Vec<u8>) -> Self {
        Value::Bytes(data)
    }
}

impl From<&[u8]> for Value {
    fn from(data: &[u8]) -> Self {
        Value::Bytes(data.to_vec())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

// == Display ==
/// Transcript rendering: strings quoted, bytes escaped, numbers plain.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(text) => write!(f, "\"{text}\""),
            Value::Bytes(data) => write!(f, "b\"{}\"", data.escape_ascii()),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_encoding() {
        assert_eq!(Value::from("hello").to_bytes(), b"hello".to_vec());
        assert_eq!(Value::from(42i64).to_bytes(), b"42".to_vec());
        assert_eq!(Value::from(2.5f64).to_bytes(), b"2.5".to_vec());
        assert_eq!(
            Value::from(vec![0u8, 1, 2]).to_bytes(),
            vec![0u8, 1, 2]
        );
    }

    #[test]
    fn test_tagged_serialization_roundtrip() {
        for value in [
            Value::from("hello"),
            Value::from(vec![0u8, 255]),
            Value::from(-7i64),
            Value::from(0.25f64),
        ] {
            let encoded = serde_json::to_vec(&value).unwrap();
            let decoded: Value = serde_json::from_slice(&encoded).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn test_tagged_encoding_keeps_kind() {
        // "42" the string and 42 the integer must not collapse into one
        let text = serde_json::to_string(&Value::from("42")).unwrap();
        let number = serde_json::to_string(&Value::from(42i64)).unwrap();
        assert_ne!(text, number);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("hi").to_string(), "\"hi\"");
        assert_eq!(Value::from(42i64).to_string(), "42");
        assert_eq!(Value::from(1.5f64).to_string(), "1.5");
        assert_eq!(Value::from(vec![104u8, 105]).to_string(), "b\"hi\"");
    }
}
