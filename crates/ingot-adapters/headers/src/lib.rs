//! # Ingot Adapter for Headers+Payload Transports
//!
//! This crate binds the Ingot event codec to any transport whose native
//! envelope is a set of string metadata slots plus one opaque payload:
//! Kafka record headers, AMQP application properties, MQTT v5 user
//! properties, or an in-memory pair.
//!
//! ## Wire layout
//!
//! Binary mode maps attributes onto slots:
//!
//! ```text
//! ce_specversion: 1.0            ← spec version hint
//! ce_id:          evt-1          ← one ce_-prefixed slot per attribute
//! ce_source:      /sensors/t4
//! ce_type:        com.example.reading
//! unit:           celsius        ← one unprefixed slot per extension
//! <payload>                      ← raw data bytes, untouched
//! ```
//!
//! Structured mode puts the whole serialized envelope in the payload and
//! only the format's media type in the `content-type` slot.
//!
//! ## Reading
//!
//! ```rust,ignore
//! use ingot_adapter_headers::{HeaderMap, reader};
//! use ingot_core::{Formats, MessageReader};
//!
//! let formats = Formats::new().with(std::sync::Arc::new(JsonFormat::new()));
//! let event = reader(headers, payload, &formats)?.into_event()?;
//! ```
//!
//! ## Writing
//!
//! ```rust,ignore
//! use ingot_adapter_headers::writer;
//! use ingot_core::MessageWriter;
//!
//! let message = writer().write_binary(&event)?;
//! producer.send(message.headers, message.payload);
//! ```

mod map;
mod read;
mod write;

pub use map::HeaderMap;
pub use read::{
    ATTRIBUTE_PREFIX, BinaryHeaderReader, CONTENT_TYPE_SLOT, HeaderReader, SPEC_VERSION_SLOT,
    reader,
};
pub use write::{HeaderMessage, HeaderMessageWriter, writer};
