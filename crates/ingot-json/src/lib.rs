//! # Ingot JSON
//!
//! The JSON structured format for the Ingot event codec.
//!
//! One event serializes to one JSON object keyed by lowercase attribute
//! names; a batch serializes to a JSON array of such objects. Extension
//! attributes keep their JSON-representable kinds (string, boolean,
//! integer). The data payload is embedded three ways:
//!
//! - JSON-typed content (`*/json`, `*+json`, or no content type):
//!   re-parsed and embedded as a raw JSON value under `data`
//! - other text: a JSON string under `data`
//! - binary: base64 under `data_base64` (version 1.0), or base64 under
//!   `data` with `datacontentencoding: "base64"` (version 0.3)
//!
//! `datacontentencoding` describes the wire form of `data`, so the
//! format owns it: it is written when binary data is base64-embedded and
//! consumed (decoded and dropped) on read.
//!
//! ## Batch reading
//!
//! A batch payload is probed by shape, explicitly and at most twice: a
//! JSON array is read element-wise, a bare object is read as a
//! one-element batch, anything else is a [`ReadError::ShapeMismatch`].
//! How a malformed element inside an array is treated is a single
//! format-level choice, [`BatchErrorPolicy`], never decided per element.

mod de;
mod ser;

use ingot_core::error::{ReadError, ReadResult, WriteError, WriteResult};
use ingot_core::{Event, EventBatch, EventFormat};
use serde_json::Value;
use tracing::warn;

use crate::de::{json_kind, read_event};
use crate::ser::JsonEventWriter;

/// Media type of a single-event JSON payload.
pub const MEDIA_TYPE: &str = "application/cloudevents+json";

/// Media type of a JSON batch payload.
pub const BATCH_MEDIA_TYPE: &str = "application/cloudevents-batch+json";

/// How the batch reader treats a malformed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchErrorPolicy {
    /// The first malformed element fails the whole batch.
    #[default]
    FailFast,
    /// Malformed elements are skipped; each skip is logged.
    SkipMalformed,
}

/// The JSON event format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat {
    batch_policy: BatchErrorPolicy,
}

impl JsonFormat {
    /// Creates the format with the [`BatchErrorPolicy::FailFast`] policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the format with an explicit batch error policy.
    pub fn with_batch_policy(policy: BatchErrorPolicy) -> Self {
        Self {
            batch_policy: policy,
        }
    }

    fn event_to_value(event: &Event) -> WriteResult<Value> {
        event.write_to(JsonEventWriter::new())
    }

    fn parse(payload: &[u8]) -> ReadResult<Value> {
        serde_json::from_slice(payload).map_err(|e| ReadError::malformed(e.to_string()))
    }
}

impl EventFormat for JsonFormat {
    fn media_type(&self) -> &'static str {
        MEDIA_TYPE
    }

    fn batch_media_type(&self) -> &'static str {
        BATCH_MEDIA_TYPE
    }

    fn serialize(&self, event: &Event) -> WriteResult<Vec<u8>> {
        let value = Self::event_to_value(event)?;
        serde_json::to_vec(&value).map_err(|e| WriteError::encode(e.to_string()))
    }

    fn serialize_batch(&self, batch: &EventBatch) -> WriteResult<Vec<u8>> {
        let values = batch
            .iter()
            .map(Self::event_to_value)
            .collect::<WriteResult<Vec<Value>>>()?;
        serde_json::to_vec(&Value::Array(values)).map_err(|e| WriteError::encode(e.to_string()))
    }

    fn deserialize(&self, payload: &[u8]) -> ReadResult<Event> {
        match Self::parse(payload)? {
            Value::Object(map) => read_event(&map),
            other => Err(ReadError::ShapeMismatch {
                expected: "object",
                actual: json_kind(&other).to_string(),
            }),
        }
    }

    fn deserialize_batch(&self, payload: &[u8]) -> ReadResult<EventBatch> {
        match Self::parse(payload)? {
            Value::Array(elements) => {
                let mut batch = EventBatch::new();
                for (index, element) in elements.iter().enumerate() {
                    let read = match element {
                        Value::Object(map) => read_event(map),
                        other => Err(ReadError::ShapeMismatch {
                            expected: "object",
                            actual: json_kind(other).to_string(),
                        }),
                    };
                    match read {
                        Ok(event) => batch.push(event),
                        Err(error) => match self.batch_policy {
                            BatchErrorPolicy::FailFast => return Err(error),
                            BatchErrorPolicy::SkipMalformed => {
                                warn!(index, %error, "skipping malformed batch element");
                            }
                        },
                    }
                }
                Ok(batch)
            }
            // Second probe of the bounded two-shape check: a bare object
            // is a one-element batch.
            Value::Object(map) => Ok(EventBatch::from(vec![read_event(&map)?])),
            other => Err(ReadError::ShapeMismatch {
                expected: "array or object",
                actual: json_kind(&other).to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::DateTime;
    use ingot_core::AttributeValue;
    use serde_json::json;

    fn format() -> JsonFormat {
        JsonFormat::new()
    }

    fn sample() -> Event {
        Event::v1()
            .id("evt-1")
            .source("/sensors/tank-4")
            .ty("com.example.reading")
            .datacontenttype("text/plain")
            .subject("tank-4")
            .time(DateTime::parse_from_rfc3339("2024-05-01T12:00:00+02:00").unwrap())
            .extension("unit", "celsius")
            .extension("calibrated", true)
            .extension("attempt", 2)
            .data("21.5")
            .build()
            .unwrap()
    }

    #[test]
    fn test_round_trip_v1() {
        let event = sample();
        let payload = format().serialize(&event).unwrap();
        let restored = format().deserialize(&payload).unwrap();
        assert_eq!(event, restored);
    }

    #[test]
    fn test_extension_kinds_survive_the_round_trip() {
        let payload = format().serialize(&sample()).unwrap();
        let restored = format().deserialize(&payload).unwrap();
        assert_eq!(
            restored.extension("calibrated"),
            Some(&AttributeValue::Boolean(true))
        );
        assert_eq!(
            restored.extension("attempt"),
            Some(&AttributeValue::Integer(2))
        );
    }

    #[test]
    fn test_binary_data_uses_data_base64_on_v1() {
        let event = Event::v1()
            .id("a")
            .source("/s")
            .ty("t")
            .datacontenttype("application/octet-stream")
            .data(Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]))
            .build()
            .unwrap();
        let payload = format().serialize(&event).unwrap();
        let value: Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value["data_base64"], json!("3q2+7w=="));
        assert!(value.get("data").is_none());

        assert_eq!(format().deserialize(&payload).unwrap(), event);
    }

    #[test]
    fn test_binary_data_uses_content_encoding_on_v03() {
        let event = Event::v03()
            .id("a")
            .source("/s")
            .ty("t")
            .datacontenttype("application/octet-stream")
            .data(Bytes::from_static(&[0xde, 0xad]))
            .build()
            .unwrap();
        let payload = format().serialize(&event).unwrap();
        let value: Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value["datacontentencoding"], json!("base64"));
        assert_eq!(value["data"], json!("3q0="));

        // The marker is consumed on read, so the restored event carries
        // the same attribute set as the original.
        assert_eq!(format().deserialize(&payload).unwrap(), event);
    }

    #[test]
    fn test_json_content_is_embedded_raw() {
        let event = Event::v1()
            .id("a")
            .source("/s")
            .ty("t")
            .datacontenttype("application/json")
            .data(Bytes::from_static(b"{\"level\":7}"))
            .build()
            .unwrap();
        let payload = format().serialize(&event).unwrap();
        let value: Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value["data"], json!({"level": 7}));

        assert_eq!(format().deserialize(&payload).unwrap(), event);
    }

    #[test]
    fn test_absent_optionals_are_omitted_from_the_object() {
        let event = Event::v1().id("a").source("/s").ty("t").build().unwrap();
        let payload = format().serialize(&event).unwrap();
        let value: Value = serde_json::from_slice(&payload).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(
            object.keys().collect::<Vec<_>>(),
            ["id", "source", "specversion", "type"]
        );
    }

    #[test]
    fn test_batch_sizes_round_trip_in_order() {
        for n in [0usize, 1, 5] {
            let batch: EventBatch = (0..n)
                .map(|i| {
                    Event::v1()
                        .id(format!("evt-{i}").as_str())
                        .source("/s")
                        .ty("t")
                        .build()
                        .unwrap()
                })
                .collect();
            let payload = format().serialize_batch(&batch).unwrap();
            let restored = format().deserialize_batch(&payload).unwrap();
            assert_eq!(restored, batch, "batch of {n}");
        }
    }

    #[test]
    fn test_bare_object_reads_as_one_element_batch() {
        let event = Event::v1().id("a").source("/s").ty("t").build().unwrap();
        let single = format().serialize(&event).unwrap();
        let array = format()
            .serialize_batch(&EventBatch::from(vec![event.clone()]))
            .unwrap();

        let from_single = format().deserialize_batch(&single).unwrap();
        let from_array = format().deserialize_batch(&array).unwrap();
        assert_eq!(from_single, from_array);
        assert_eq!(from_single.len(), 1);
        assert_eq!(from_single[0], event);
    }

    #[test]
    fn test_scalar_payload_is_a_shape_mismatch() {
        let err = format().deserialize_batch(b"42").unwrap_err();
        assert_eq!(
            err,
            ReadError::ShapeMismatch {
                expected: "array or object",
                actual: "number".into(),
            }
        );

        let err = format().deserialize(b"42").unwrap_err();
        assert_eq!(
            err,
            ReadError::ShapeMismatch {
                expected: "object",
                actual: "number".into(),
            }
        );
    }

    #[test]
    fn test_single_event_read_of_an_array_is_a_shape_mismatch() {
        let payload = format()
            .serialize_batch(&EventBatch::from(vec![
                Event::v1().id("a").source("/s").ty("t").build().unwrap(),
            ]))
            .unwrap();
        let err = format().deserialize(&payload).unwrap_err();
        assert!(matches!(err, ReadError::ShapeMismatch { actual, .. } if actual == "array"));
    }

    #[test]
    fn test_fail_fast_propagates_element_errors() {
        let payload = serde_json::to_vec(&json!([
            {"specversion": "1.0", "id": "a", "source": "/s", "type": "t"},
            {"specversion": "1.0", "source": "/s", "type": "t"},
        ]))
        .unwrap();
        let err = format().deserialize_batch(&payload).unwrap_err();
        assert_eq!(err, ReadError::MissingAttribute { name: "id" });
    }

    #[test]
    fn test_skip_malformed_keeps_the_healthy_elements() {
        let payload = serde_json::to_vec(&json!([
            {"specversion": "1.0", "id": "a", "source": "/s", "type": "t"},
            {"specversion": "1.0", "source": "/s", "type": "t"},
            7,
            {"specversion": "1.0", "id": "b", "source": "/s", "type": "t"},
        ]))
        .unwrap();
        let batch = JsonFormat::with_batch_policy(BatchErrorPolicy::SkipMalformed)
            .deserialize_batch(&payload)
            .unwrap();
        assert_eq!(
            batch.iter().map(Event::id).collect::<Vec<_>>(),
            ["a", "b"]
        );
    }

    #[test]
    fn test_missing_specversion_is_named() {
        let payload = serde_json::to_vec(&json!({"id": "a", "source": "/s", "type": "t"})).unwrap();
        assert_eq!(
            format().deserialize(&payload).unwrap_err(),
            ReadError::MissingAttribute {
                name: "specversion"
            }
        );
    }

    #[test]
    fn test_syntactically_broken_payload_is_malformed() {
        assert!(matches!(
            format().deserialize(b"{not json").unwrap_err(),
            ReadError::Malformed { .. }
        ));
    }

    #[test]
    fn test_non_string_context_attribute_is_invalid() {
        let payload =
            serde_json::to_vec(&json!({"specversion": "1.0", "id": 7, "source": "/s", "type": "t"}))
                .unwrap();
        let err = format().deserialize(&payload).unwrap_err();
        assert!(matches!(err, ReadError::InvalidAttribute { name, .. } if name == "id"));
    }
}
