//! Reading events out of a headers+payload message.

use bytes::Bytes;
use ingot_core::error::{ReadError, ReadResult};
use ingot_core::event::spec_version::names;
use ingot_core::event::{AttributeValue, Event, EventData, SpecVersion};
use ingot_core::format::Formats;
use ingot_core::message::{Encoding, MessageReader, Negotiated, StructuredReader, negotiate};
use ingot_core::EventBatch;
use tracing::warn;

use crate::map::HeaderMap;

/// Prefix of every context-attribute metadata slot.
pub const ATTRIBUTE_PREFIX: &str = "ce_";

/// Metadata slot carrying the spec version hint in binary mode.
pub const SPEC_VERSION_SLOT: &str = "ce_specversion";

/// Metadata slot carrying the content type hint.
pub const CONTENT_TYPE_SLOT: &str = "content-type";

/// Classifies a headers+payload message and returns the matching reader.
///
/// Negotiation probes the `content-type` slot first and the
/// `ce_specversion` slot second; the payload is never touched. In
/// structured mode the sub-format is resolved from `formats`; an
/// unresolvable sub-format is a classification error.
pub fn reader(
    headers: HeaderMap,
    payload: impl Into<Bytes>,
    formats: &Formats,
) -> ReadResult<HeaderReader> {
    match negotiate(
        headers.get(CONTENT_TYPE_SLOT),
        headers.get(SPEC_VERSION_SLOT),
    )? {
        Negotiated::Structured { content_type } => {
            let format = formats
                .resolve(&content_type)
                .ok_or(ReadError::UnknownEncoding)?;
            Ok(HeaderReader::Structured(StructuredReader::new(
                format,
                payload.into(),
            )))
        }
        Negotiated::Binary(version) => Ok(HeaderReader::Binary(BinaryHeaderReader {
            version,
            headers,
            payload: payload.into(),
        })),
    }
}

/// A [`MessageReader`] over a headers+payload message.
#[derive(Debug)]
pub enum HeaderReader {
    Structured(StructuredReader),
    Binary(BinaryHeaderReader),
}

impl MessageReader for HeaderReader {
    fn encoding(&self) -> Encoding {
        match self {
            HeaderReader::Structured(_) => Encoding::Structured,
            HeaderReader::Binary(_) => Encoding::Binary,
        }
    }

    fn into_event(self) -> ReadResult<Event> {
        match self {
            HeaderReader::Structured(reader) => reader.into_event(),
            HeaderReader::Binary(reader) => reader.read(),
        }
    }

    fn into_batch(self) -> ReadResult<EventBatch> {
        match self {
            HeaderReader::Structured(reader) => reader.into_batch(),
            HeaderReader::Binary(_) => Err(ReadError::ShapeMismatch {
                expected: "structured batch message",
                actual: "binary-mode message".to_string(),
            }),
        }
    }
}

/// Binary-mode reader: one metadata slot per attribute, payload = data.
#[derive(Debug)]
pub struct BinaryHeaderReader {
    version: SpecVersion,
    headers: HeaderMap,
    payload: Bytes,
}

impl BinaryHeaderReader {
    /// Walks every metadata slot into a builder.
    ///
    /// `ce_`-prefixed slots become context attributes when the suffix is
    /// in the resolved version's attribute set, extensions otherwise;
    /// the bare `content-type` slot maps to `datacontenttype`
    /// (compatibility with bindings that store it natively); any other
    /// unprefixed slot becomes an extension under its own name. A slot
    /// whose name collides with a context attribute is folded into that
    /// attribute, last-write-wins. Fails only when a required attribute
    /// slot is absent or a value fails kind coercion.
    fn read(self) -> ReadResult<Event> {
        let mut builder = Event::builder(self.version);
        for (name, value) in self.headers.iter() {
            let key = name.to_ascii_lowercase();
            if key == SPEC_VERSION_SLOT {
                // Already consumed during negotiation.
                continue;
            }
            if let Some(suffix) = key.strip_prefix(ATTRIBUTE_PREFIX) {
                if self.version.attribute(suffix).is_some() {
                    builder.set_attribute(suffix, AttributeValue::from(value))?;
                } else {
                    builder.set_extension(suffix, AttributeValue::from(value))?;
                }
            } else if key == CONTENT_TYPE_SLOT {
                builder.set_attribute(names::DATACONTENTTYPE, AttributeValue::from(value))?;
            } else if self.version.attribute(&key).is_some() {
                warn!(
                    slot = name,
                    "transport slot collides with a context attribute; last write wins"
                );
                builder.set_attribute(&key, AttributeValue::from(value))?;
            } else {
                builder.set_extension(&key, AttributeValue::from(value))?;
            }
        }
        if !self.payload.is_empty() {
            builder.set_data(EventData::Binary(self.payload));
        }
        builder.build()
    }
}
