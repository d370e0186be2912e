//! Event payload representations.
//!
//! An event's data is opaque to the codec and exposed through two
//! equivalent views: raw bytes and UTF-8 text. Text-backed data converts
//! to bytes lazily, exactly once, behind a thread-safe cell, so a caller
//! that only ever needs the text view never pays for the byte copy.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bytes::Bytes;
use once_cell::sync::OnceCell;

/// The opaque payload of an event.
///
/// Equality and hashing are byte-wise: a text payload and a binary
/// payload with identical bytes compare equal.
#[derive(Debug, Clone)]
pub enum EventData {
    /// Raw bytes.
    Binary(Bytes),
    /// UTF-8 text with a lazily materialized byte view.
    Text(TextData),
}

impl EventData {
    /// Wraps raw bytes.
    pub fn binary(bytes: impl Into<Bytes>) -> Self {
        EventData::Binary(bytes.into())
    }

    /// Wraps UTF-8 text.
    pub fn text(text: impl Into<Arc<str>>) -> Self {
        EventData::Text(TextData {
            value: text.into(),
            bytes: OnceCell::new(),
        })
    }

    /// Returns the byte view of the payload.
    ///
    /// Cheap for binary payloads (`Bytes` is reference-counted); for text
    /// payloads the bytes are materialized on first access and cached.
    pub fn to_bytes(&self) -> Bytes {
        match self {
            EventData::Binary(b) => b.clone(),
            EventData::Text(t) => t.to_bytes(),
        }
    }

    /// Returns the text view, if this payload is text-backed.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            EventData::Binary(_) => None,
            EventData::Text(t) => Some(t.value.as_ref()),
        }
    }
}

impl PartialEq for EventData {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for EventData {}

impl Hash for EventData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state);
    }
}

impl From<Bytes> for EventData {
    fn from(b: Bytes) -> Self {
        EventData::Binary(b)
    }
}

impl From<Vec<u8>> for EventData {
    fn from(v: Vec<u8>) -> Self {
        EventData::Binary(Bytes::from(v))
    }
}

impl From<&[u8]> for EventData {
    fn from(v: &[u8]) -> Self {
        EventData::Binary(Bytes::copy_from_slice(v))
    }
}

impl From<String> for EventData {
    fn from(s: String) -> Self {
        EventData::text(s.as_str())
    }
}

impl From<&str> for EventData {
    fn from(s: &str) -> Self {
        EventData::text(s)
    }
}

/// UTF-8 payload with single-assignment byte-view caching.
#[derive(Debug, Clone)]
pub struct TextData {
    value: Arc<str>,
    bytes: OnceCell<Bytes>,
}

impl TextData {
    fn to_bytes(&self) -> Bytes {
        self.bytes
            .get_or_init(|| Bytes::copy_from_slice(self.value.as_bytes()))
            .clone()
    }
}
