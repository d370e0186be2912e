//! Event → JSON object, through the attribute visitor protocol.

use base64::Engine as _;
use ingot_core::error::{WriteError, WriteResult};
use ingot_core::event::spec_version::names;
use ingot_core::event::{AttributeValue, EventData, SpecVersion};
use ingot_core::rw::{AttributeWriter, EventWriter};
use serde_json::{Map, Value};

/// Returns true when the content type carries JSON, so the payload can
/// be embedded as a raw JSON value. An absent content type defaults to
/// JSON in this format.
pub(crate) fn is_json_content(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(ct) => {
            let essence = ingot_core::media_type_essence(ct);
            essence == "application/json" || essence == "text/json" || essence.ends_with("+json")
        }
    }
}

/// An [`EventWriter`] whose target is one JSON object.
#[derive(Default)]
pub(crate) struct JsonEventWriter {
    map: Map<String, Value>,
    version: Option<SpecVersion>,
    datacontenttype: Option<String>,
}

impl JsonEventWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl AttributeWriter for JsonEventWriter {
    fn set_attribute(&mut self, name: &str, value: AttributeValue) -> WriteResult<()> {
        let wire = value.to_wire_string();
        if name == names::SPECVERSION {
            let version = wire
                .parse::<SpecVersion>()
                .map_err(|_| WriteError::unsupported(name, format!("unknown version {wire}")))?;
            self.version = Some(version);
        } else if name == names::DATACONTENTTYPE {
            self.datacontenttype = Some(wire.clone());
        }
        self.map.insert(name.to_string(), Value::String(wire));
        Ok(())
    }

    fn set_extension(&mut self, name: &str, value: AttributeValue) -> WriteResult<()> {
        // Extensions keep their JSON-representable kinds; everything
        // else falls back to the canonical string form.
        let json = match value {
            AttributeValue::Boolean(b) => Value::Bool(b),
            AttributeValue::Integer(i) => Value::from(i),
            other => Value::String(other.to_wire_string()),
        };
        self.map.insert(name.to_string(), json);
        Ok(())
    }
}

impl EventWriter for JsonEventWriter {
    type Output = Value;

    fn end_with_data(mut self, data: EventData) -> WriteResult<Value> {
        let version = self
            .version
            .ok_or_else(|| WriteError::encode("specversion was never visited"))?;

        if is_json_content(self.datacontenttype.as_deref()) {
            if let Ok(value) = serde_json::from_slice::<Value>(&data.to_bytes()) {
                self.map.insert("data".to_string(), value);
                return Ok(Value::Object(self.map));
            }
        }

        match data.as_text() {
            Some(text) => {
                // The payload rides as a plain JSON string; a stale
                // base64 marker would make readers decode it.
                if self
                    .map
                    .get(names::DATACONTENTENCODING)
                    .and_then(Value::as_str)
                    == Some("base64")
                {
                    self.map.remove(names::DATACONTENTENCODING);
                }
                self.map
                    .insert("data".to_string(), Value::String(text.to_string()));
            }
            None => {
                let encoded =
                    base64::engine::general_purpose::STANDARD.encode(data.to_bytes());
                match version {
                    SpecVersion::V1 => {
                        self.map
                            .insert("data_base64".to_string(), Value::String(encoded));
                    }
                    SpecVersion::V03 => {
                        self.map.insert("data".to_string(), Value::String(encoded));
                        self.map.insert(
                            names::DATACONTENTENCODING.to_string(),
                            Value::String("base64".to_string()),
                        );
                    }
                }
            }
        }
        Ok(Value::Object(self.map))
    }

    fn end(self) -> WriteResult<Value> {
        Ok(Value::Object(self.map))
    }
}
