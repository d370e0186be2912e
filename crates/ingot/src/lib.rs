//! # Ingot
//!
//! A transport-agnostic event envelope codec.
//!
//! ## Overview
//!
//! Ingot represents one structured "event" identically across wire
//! transports (HTTP, Kafka, AMQP, MQTT, in-memory JSON) in two
//! alternative encodings: **structured mode** (the whole event as one
//! self-describing payload) and **binary mode** (attributes mapped onto
//! transport metadata, the payload carrying only the event's data).
//! Transport adapters and the codec core never reference each other's
//! concrete types — they meet at a small visitor protocol.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   negotiate    ┌───────────────┐   visitor    ┌─────────┐
//! │  transport   │───────────────▶│ reader/writer │─────────────▶│  Event  │
//! │ (headers, …) │   metadata     │  (per mode)   │   protocol   │ (value) │
//! └──────────────┘                └───────────────┘              └─────────┘
//! ```
//!
//! - **ingot-core**: event model, visitor protocol, negotiation,
//!   extension registry, format abstraction
//! - **ingot-json**: the JSON structured format
//! - **ingot-adapter-headers** (feature `headers`): binding for
//!   headers+payload transports
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ingot::prelude::*;
//! use ingot::json::JsonFormat;
//!
//! let event = Event::v1()
//!     .id("evt-1")
//!     .source("/sensors/tank-4")
//!     .ty("com.example.reading")
//!     .data("{\"level\":7}")
//!     .build()?;
//!
//! let format = JsonFormat::new();
//! let payload = format.serialize(&event)?;
//! assert_eq!(format.deserialize(&payload)?, event);
//! ```
//!
//! ## Features
//!
//! - `headers`: Enable the headers+payload transport binding

pub use ingot_core as core;
pub use ingot_json as json;

#[cfg(feature = "headers")]
pub use ingot_adapter_headers as headers;

pub use ingot_core::{
    AttributeKind, AttributeValue, AttributeWriter, Encoding, Event, EventBatch, EventBuilder,
    EventData, EventFormat, EventWriter, Extension, ExtensionRegistry, Formats, MessageReader,
    MessageWriter, Negotiated, ReadError, ReadResult, SpecVersion, WriteError, WriteResult,
    default_registry, negotiate,
};
pub use ingot_json::JsonFormat;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use ingot_core::prelude::*;
    pub use ingot_json::JsonFormat;

    #[cfg(feature = "headers")]
    pub use ingot_adapter_headers::{HeaderMap, HeaderMessage, reader, writer};
}
