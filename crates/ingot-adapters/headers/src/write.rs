//! Writing events into a headers+payload message.

use bytes::Bytes;
use ingot_core::error::{WriteError, WriteResult};
use ingot_core::event::{AttributeValue, Event, EventData};
use ingot_core::format::EventFormat;
use ingot_core::message::MessageWriter;
use ingot_core::rw::{AttributeWriter, EventWriter};

use crate::map::HeaderMap;
use crate::read::{ATTRIBUTE_PREFIX, CONTENT_TYPE_SLOT};

/// The populated transport representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMessage {
    /// The metadata slots.
    pub headers: HeaderMap,
    /// The native payload: raw event data in binary mode, the serialized
    /// envelope in structured mode, absent when the event carries no data.
    pub payload: Option<Bytes>,
}

/// A [`MessageWriter`] producing a [`HeaderMessage`].
#[derive(Debug, Clone, Default)]
pub struct HeaderMessageWriter {
    headers: HeaderMap,
    value_limit: Option<usize>,
}

/// Starts a writer over an empty header map.
pub fn writer() -> HeaderMessageWriter {
    HeaderMessageWriter::default()
}

impl HeaderMessageWriter {
    /// Starts a writer over a pre-populated target handle, e.g. headers
    /// the transport layer already attached.
    pub fn with_headers(headers: HeaderMap) -> Self {
        Self {
            headers,
            value_limit: None,
        }
    }

    /// Imposes a per-slot value size limit (in bytes).
    ///
    /// A visited attribute whose wire form exceeds the limit aborts the
    /// write with an error naming it.
    pub fn value_limit(mut self, limit: usize) -> Self {
        self.value_limit = Some(limit);
        self
    }
}

impl MessageWriter for HeaderMessageWriter {
    type Output = HeaderMessage;

    fn write_structured(
        mut self,
        event: &Event,
        format: &dyn EventFormat,
    ) -> WriteResult<HeaderMessage> {
        let payload = format.serialize(event)?;
        self.headers.insert(CONTENT_TYPE_SLOT, format.media_type());
        Ok(HeaderMessage {
            headers: self.headers,
            payload: Some(Bytes::from(payload)),
        })
    }

    fn write_binary(self, event: &Event) -> WriteResult<HeaderMessage> {
        event.write_to(BinarySlotWriter {
            headers: self.headers,
            value_limit: self.value_limit,
        })
    }
}

/// Binary-mode slot writer: one `ce_`-prefixed slot per set context
/// attribute, one unprefixed slot per extension, payload = raw data.
struct BinarySlotWriter {
    headers: HeaderMap,
    value_limit: Option<usize>,
}

impl BinarySlotWriter {
    fn push(&mut self, slot: String, name: &str, value: &AttributeValue) -> WriteResult<()> {
        let wire = value.to_wire_string();
        if let Some(limit) = self.value_limit {
            if wire.len() > limit {
                return Err(WriteError::LimitExceeded {
                    name: name.to_string(),
                    reason: format!("value of {} bytes exceeds slot limit of {limit}", wire.len()),
                });
            }
        }
        self.headers.insert(slot, wire);
        Ok(())
    }
}

impl AttributeWriter for BinarySlotWriter {
    fn set_attribute(&mut self, name: &str, value: AttributeValue) -> WriteResult<()> {
        self.push(format!("{ATTRIBUTE_PREFIX}{name}"), name, &value)
    }

    fn set_extension(&mut self, name: &str, value: AttributeValue) -> WriteResult<()> {
        self.push(name.to_string(), name, &value)
    }
}

impl EventWriter for BinarySlotWriter {
    type Output = HeaderMessage;

    fn end_with_data(self, data: EventData) -> WriteResult<HeaderMessage> {
        Ok(HeaderMessage {
            headers: self.headers,
            payload: Some(data.to_bytes()),
        })
    }

    fn end(self) -> WriteResult<HeaderMessage> {
        Ok(HeaderMessage {
            headers: self.headers,
            payload: None,
        })
    }
}
