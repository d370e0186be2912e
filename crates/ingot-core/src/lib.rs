//! # Ingot Core
//!
//! The core engine of the Ingot event envelope codec.
//!
//! Ingot represents one structured "event" identically across many wire
//! transports (HTTP, Kafka, AMQP, MQTT, in-memory JSON) in two
//! alternative encodings:
//!
//! - **Structured mode**: the entire event is one self-describing
//!   payload (e.g. a JSON document).
//! - **Binary mode**: context attributes map onto transport-native
//!   metadata fields and only the data payload occupies the transport's
//!   native body.
//!
//! This crate holds everything transport adapters share:
//!
//! - **Event Model**: immutable events with version-specific context
//!   attributes, open extensions, and opaque data ([`Event`],
//!   [`EventData`], [`EventBatch`])
//! - **Visitor Protocol**: the paired write/read capabilities that let
//!   any event reach any target representation and back
//!   ([`AttributeWriter`], [`EventWriter`], [`EventBuilder`])
//! - **Negotiation**: structured-vs-binary classification from metadata
//!   probes ([`negotiate`], [`MessageReader`], [`MessageWriter`])
//! - **Formats**: the structured-encoding abstraction ([`EventFormat`],
//!   [`Formats`])
//! - **Extensions**: typed extension attributes and their registry
//!   ([`Extension`], [`ExtensionRegistry`])
//!
//! ## Control Flow
//!
//! ```text
//! transport metadata ─▶ negotiate ─▶ structured ─▶ EventFormat ──┐
//!                                 └▶ binary ─▶ adapter slots ────┤
//!                                                                ▼
//!                                            EventBuilder ─▶ Event
//!
//! Event ─write_to─▶ EventWriter (format serializer / adapter slots)
//! ```
//!
//! The core is fully synchronous and performs no I/O: byte and metadata
//! sources and sinks are handed in by the transport layer.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ingot_core::{Event, MessageReader};
//!
//! let event = Event::v1()
//!     .id("evt-1")
//!     .source("/sensors/tank-4")
//!     .ty("com.example.reading")
//!     .extension("unit", "celsius")
//!     .data("{\"level\":7}")
//!     .build()?;
//!
//! let payload = format.serialize(&event)?;
//! let restored = ingot_core::StructuredReader::new(format, payload).into_event()?;
//! assert_eq!(event, restored);
//! ```

pub mod batch;
pub mod error;
pub mod event;
pub mod extensions;
pub mod format;
pub mod message;
pub mod rw;

// Re-export the event model
pub use event::{
    AttributeKind, AttributeValue, Attributes, AttributesV03, AttributesV1, Event, EventBuilder,
    EventData, SpecVersion,
};

// Re-export the protocol surface
pub use batch::EventBatch;
pub use error::{ReadError, ReadResult, WriteError, WriteResult};
pub use extensions::{Extension, ExtensionRegistry, default_registry};
pub use format::{EventFormat, Formats, media_type_essence};
pub use message::{
    Encoding, MessageReader, MessageWriter, Negotiated, STRUCTURED_MEDIA_TYPE_FAMILY,
    StructuredReader, negotiate,
};
pub use rw::{AttributeWriter, EventWriter};

/// Prelude for common imports.
pub mod prelude {
    pub use super::batch::EventBatch;
    pub use super::error::{ReadError, ReadResult, WriteError, WriteResult};
    pub use super::event::{AttributeValue, Event, EventData, SpecVersion};
    pub use super::extensions::{Extension, ExtensionRegistry};
    pub use super::format::{EventFormat, Formats};
    pub use super::message::{Encoding, MessageReader, MessageWriter, negotiate};
    pub use super::rw::{AttributeWriter, EventWriter};
}
