//! Message abstraction and content-mode negotiation.
//!
//! A *message* is the transport-native envelope (metadata + payload)
//! that adapters convert to and from events. Before any attribute is
//! touched, the negotiator classifies an inbound message as structured
//! or binary using two cheap metadata probes:
//!
//! 1. A content-type-like hint. If it belongs to the structured media
//!    type family, the message is structured — regardless of any spec
//!    version hint, because a structured payload may itself carry a
//!    misleading secondary metadata field.
//! 2. Otherwise a spec-version-like hint selects the binary mode.
//! 3. Neither probe matching is a classification error.
//!
//! The payload is never inspected during negotiation.

use std::sync::Arc;

use bytes::Bytes;

use crate::batch::EventBatch;
use crate::error::{ReadError, ReadResult, WriteResult};
use crate::event::spec_version::SpecVersion;
use crate::event::Event;
use crate::format::{media_type_essence, EventFormat};

/// Media type family shared by all structured encodings.
pub const STRUCTURED_MEDIA_TYPE_FAMILY: &str = "application/cloudevents";

// =============================================================================
// Negotiation
// =============================================================================

/// How a message carries its event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// The whole event is one self-describing payload.
    Structured,
    /// Attributes live in transport metadata; the payload is the data.
    Binary,
}

/// Outcome of content-mode negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiated {
    /// Structured mode, parameterized by the (parameter-stripped)
    /// content type naming the sub-format.
    Structured {
        /// Content type essence, e.g. `application/cloudevents+json`.
        content_type: String,
    },
    /// Binary mode for the given spec version.
    Binary(SpecVersion),
}

/// Classifies a message from its metadata probes alone.
///
/// Structured framing takes priority over binary framing whenever both
/// hints are present. Fails with [`ReadError::UnknownEncoding`] when
/// neither probe applies, or [`ReadError::UnsupportedSpecVersion`] when
/// a spec version hint is present but unrecognized.
pub fn negotiate(
    content_type: Option<&str>,
    spec_version: Option<&str>,
) -> ReadResult<Negotiated> {
    if let Some(ct) = content_type {
        let essence = media_type_essence(ct);
        if essence.starts_with(STRUCTURED_MEDIA_TYPE_FAMILY) {
            return Ok(Negotiated::Structured {
                content_type: essence.to_string(),
            });
        }
    }
    if let Some(version) = spec_version {
        return version.parse().map(Negotiated::Binary);
    }
    Err(ReadError::UnknownEncoding)
}

// =============================================================================
// Message Capabilities
// =============================================================================

/// Read capability handed to callers once a message is classified.
///
/// Each conversion consumes the reader, so it is usable exactly once —
/// whichever of the two matches the resolved encoding.
pub trait MessageReader: Sized {
    /// The encoding this reader was resolved for.
    fn encoding(&self) -> Encoding;

    /// Converts the message into a single event.
    fn into_event(self) -> ReadResult<Event>;

    /// Converts the message into an event batch.
    fn into_batch(self) -> ReadResult<EventBatch>;
}

/// Write capability over a transport-specific target handle.
///
/// A successful visit returns the populated result; on error the
/// partially populated target is consumed and discarded.
pub trait MessageWriter: Sized {
    /// The populated transport representation.
    type Output;

    /// Writes the event in structured mode using the given format.
    fn write_structured(self, event: &Event, format: &dyn EventFormat)
    -> WriteResult<Self::Output>;

    /// Writes the event in binary mode.
    fn write_binary(self, event: &Event) -> WriteResult<Self::Output>;
}

// =============================================================================
// Generic Structured Reader
// =============================================================================

/// A [`MessageReader`] over a structured payload and its resolved format.
///
/// Works for any transport: the adapter only supplies the payload bytes.
pub struct StructuredReader {
    format: Arc<dyn EventFormat>,
    payload: Bytes,
}

impl StructuredReader {
    /// Creates a reader over a payload in the given format.
    pub fn new(format: Arc<dyn EventFormat>, payload: impl Into<Bytes>) -> Self {
        Self {
            format,
            payload: payload.into(),
        }
    }
}

impl std::fmt::Debug for StructuredReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredReader")
            .field("format", &self.format.media_type())
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

impl MessageReader for StructuredReader {
    fn encoding(&self) -> Encoding {
        Encoding::Structured
    }

    fn into_event(self) -> ReadResult<Event> {
        self.format.deserialize(&self.payload)
    }

    fn into_batch(self) -> ReadResult<EventBatch> {
        self.format.deserialize_batch(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_hint_wins_over_binary_hint() {
        let negotiated = negotiate(
            Some("application/cloudevents+json; charset=utf-8"),
            Some("1.0"),
        )
        .unwrap();
        assert_eq!(
            negotiated,
            Negotiated::Structured {
                content_type: "application/cloudevents+json".into()
            }
        );
    }

    #[test]
    fn test_batch_media_type_is_structured() {
        let negotiated = negotiate(Some("application/cloudevents-batch+json"), None).unwrap();
        assert!(matches!(negotiated, Negotiated::Structured { .. }));
    }

    #[test]
    fn test_foreign_content_type_falls_back_to_binary() {
        let negotiated = negotiate(Some("application/json"), Some("1.0")).unwrap();
        assert_eq!(negotiated, Negotiated::Binary(SpecVersion::V1));
    }

    #[test]
    fn test_no_probe_matches() {
        assert_eq!(
            negotiate(Some("text/plain"), None),
            Err(ReadError::UnknownEncoding)
        );
        assert_eq!(negotiate(None, None), Err(ReadError::UnknownEncoding));
    }

    #[test]
    fn test_recognized_hint_with_unsupported_version() {
        assert_eq!(
            negotiate(None, Some("0.2")),
            Err(ReadError::UnsupportedSpecVersion { found: "0.2".into() })
        );
    }
}
