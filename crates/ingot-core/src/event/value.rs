//! Typed attribute values and their wire encodings.
//!
//! Context and extension attributes share one closed set of value kinds.
//! Every kind has a canonical string form used by binary-mode transports
//! (metadata slots are string-typed); structured formats may preserve
//! richer kinds where their encoding allows it.

use std::fmt;
use std::sync::Arc;

use base64::Engine as _;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};

// =============================================================================
// Value Kinds
// =============================================================================

/// The closed set of attribute value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Boolean,
    Integer,
    String,
    /// A URI-reference, kept textual (may be relative).
    Uri,
    /// An RFC 3339 timestamp with offset.
    Time,
    Binary,
}

impl AttributeKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Boolean => "boolean",
            AttributeKind::Integer => "integer",
            AttributeKind::String => "string",
            AttributeKind::Uri => "uri",
            AttributeKind::Time => "time",
            AttributeKind::Binary => "binary",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Attribute Values
// =============================================================================

/// A strongly-typed attribute value.
///
/// String storage is shared (`Arc<str>`) and binary payloads are
/// reference-counted (`Bytes`), so cloning a value is cheap everywhere
/// the visitor protocol hands one across a boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    Boolean(bool),
    Integer(i32),
    String(Arc<str>),
    Uri(Arc<str>),
    Time(DateTime<FixedOffset>),
    Binary(Bytes),
}

impl AttributeValue {
    /// Returns the kind of this value.
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Boolean(_) => AttributeKind::Boolean,
            AttributeValue::Integer(_) => AttributeKind::Integer,
            AttributeValue::String(_) => AttributeKind::String,
            AttributeValue::Uri(_) => AttributeKind::Uri,
            AttributeValue::Time(_) => AttributeKind::Time,
            AttributeValue::Binary(_) => AttributeKind::Binary,
        }
    }

    /// Returns the textual content for string-like kinds.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) | AttributeValue::Uri(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Canonical string form, as carried by string-typed metadata slots.
    ///
    /// Booleans render as `true`/`false`, integers as decimal, timestamps
    /// as RFC 3339, binary as standard base64.
    pub fn to_wire_string(&self) -> String {
        match self {
            AttributeValue::Boolean(b) => b.to_string(),
            AttributeValue::Integer(i) => i.to_string(),
            AttributeValue::String(s) | AttributeValue::Uri(s) => s.to_string(),
            AttributeValue::Time(t) => t.to_rfc3339(),
            AttributeValue::Binary(b) => base64::engine::general_purpose::STANDARD.encode(b),
        }
    }

    /// Attempts to coerce this value into the given kind.
    ///
    /// String values parse into any kind (the binary-mode wire carries
    /// everything as strings); `String`/`Uri` convert freely into each
    /// other; any other cross-kind coercion fails. On failure the
    /// original value is handed back so the caller can describe it.
    pub fn coerce(self, kind: AttributeKind) -> Result<Self, Self> {
        if self.kind() == kind {
            return Ok(self);
        }
        match (self, kind) {
            (AttributeValue::String(s), AttributeKind::Uri) => Ok(AttributeValue::Uri(s)),
            (AttributeValue::Uri(s), AttributeKind::String) => Ok(AttributeValue::String(s)),
            (AttributeValue::String(s), AttributeKind::Boolean) => match s.as_ref() {
                "true" => Ok(AttributeValue::Boolean(true)),
                "false" => Ok(AttributeValue::Boolean(false)),
                _ => Err(AttributeValue::String(s)),
            },
            (AttributeValue::String(s), AttributeKind::Integer) => s
                .as_ref()
                .parse::<i32>()
                .map(AttributeValue::Integer)
                .map_err(|_| AttributeValue::String(s)),
            (AttributeValue::String(s), AttributeKind::Time) => {
                DateTime::parse_from_rfc3339(s.as_ref())
                    .map(AttributeValue::Time)
                    .map_err(|_| AttributeValue::String(s))
            }
            (AttributeValue::String(s), AttributeKind::Binary) => {
                base64::engine::general_purpose::STANDARD
                    .decode(s.as_ref())
                    .map(|b| AttributeValue::Binary(Bytes::from(b)))
                    .map_err(|_| AttributeValue::String(s))
            }
            (value, _) => Err(value),
        }
    }

    /// Short description of this value for error reporting.
    pub fn describe(&self) -> String {
        match self {
            AttributeValue::String(s) | AttributeValue::Uri(s) => {
                format!("{} {:?}", self.kind(), s.as_ref())
            }
            AttributeValue::Binary(b) => format!("binary ({} bytes)", b.len()),
            other => format!("{} {}", other.kind(), other.to_wire_string()),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(Arc::from(s))
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(Arc::from(s.as_str()))
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Boolean(b)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<DateTime<FixedOffset>> for AttributeValue {
    fn from(t: DateTime<FixedOffset>) -> Self {
        AttributeValue::Time(t)
    }
}

impl From<Bytes> for AttributeValue {
    fn from(b: Bytes) -> Self {
        AttributeValue::Binary(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_string_forms() {
        assert_eq!(AttributeValue::Boolean(true).to_wire_string(), "true");
        assert_eq!(AttributeValue::Integer(-7).to_wire_string(), "-7");
        assert_eq!(AttributeValue::from("abc").to_wire_string(), "abc");
        assert_eq!(
            AttributeValue::Binary(Bytes::from_static(b"hi")).to_wire_string(),
            "aGk="
        );
    }

    #[test]
    fn test_string_coerces_into_every_kind() {
        let time = AttributeValue::from("2024-05-01T12:00:00+02:00")
            .coerce(AttributeKind::Time)
            .unwrap();
        assert_eq!(time.kind(), AttributeKind::Time);
        assert_eq!(
            AttributeValue::from("42").coerce(AttributeKind::Integer),
            Ok(AttributeValue::Integer(42))
        );
        assert_eq!(
            AttributeValue::from("false").coerce(AttributeKind::Boolean),
            Ok(AttributeValue::Boolean(false))
        );
        assert_eq!(
            AttributeValue::from("aGk=").coerce(AttributeKind::Binary),
            Ok(AttributeValue::Binary(Bytes::from_static(b"hi")))
        );
    }

    #[test]
    fn test_failed_coercion_returns_original() {
        let err = AttributeValue::from("not a date")
            .coerce(AttributeKind::Time)
            .unwrap_err();
        assert_eq!(err.as_str(), Some("not a date"));
    }

    #[test]
    fn test_cross_kind_coercion_is_strict() {
        assert!(
            AttributeValue::Boolean(true)
                .coerce(AttributeKind::Integer)
                .is_err()
        );
        assert!(
            AttributeValue::Integer(1)
                .coerce(AttributeKind::Time)
                .is_err()
        );
    }

    #[test]
    fn test_time_round_trips_through_wire_string() {
        let wire = "2024-05-01T12:00:00+02:00";
        let value = AttributeValue::from(wire).coerce(AttributeKind::Time).unwrap();
        assert_eq!(value.to_wire_string(), wire);
    }
}
