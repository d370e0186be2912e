//! JSON object → event, feeding the builder through the protocol setters.

use base64::Engine as _;
use ingot_core::error::{ReadError, ReadResult};
use ingot_core::event::spec_version::names;
use ingot_core::event::value::AttributeKind;
use ingot_core::event::{AttributeValue, Event, EventData, SpecVersion};
use serde_json::{Map, Value};

/// Names the JSON shape of a value, for error reporting.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("string {s:?}"),
        other => format!("{} {other}", json_kind(other)),
    }
}

/// Converts a JSON extension value into an attribute value.
///
/// Extensions are limited to the JSON-representable kinds: string,
/// boolean, and (32-bit) integer.
fn extension_value(name: &str, value: &Value) -> ReadResult<AttributeValue> {
    match value {
        Value::Bool(b) => Ok(AttributeValue::Boolean(*b)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .map(AttributeValue::Integer)
            .ok_or_else(|| {
                ReadError::invalid_attribute(name, AttributeKind::Integer, describe(value))
            }),
        Value::String(s) => Ok(AttributeValue::from(s.as_str())),
        other => Err(ReadError::invalid_attribute(
            name,
            AttributeKind::String,
            describe(other),
        )),
    }
}

/// Reads one event out of a parsed JSON object.
pub(crate) fn read_event(map: &Map<String, Value>) -> ReadResult<Event> {
    let version_value = map
        .get(names::SPECVERSION)
        .ok_or(ReadError::MissingAttribute {
            name: names::SPECVERSION,
        })?;
    let version: SpecVersion = version_value
        .as_str()
        .ok_or_else(|| {
            ReadError::invalid_attribute(
                names::SPECVERSION,
                AttributeKind::String,
                describe(version_value),
            )
        })?
        .parse()?;

    let mut builder = Event::builder(version);
    let mut data: Option<&Value> = None;
    let mut data_base64: Option<&Value> = None;
    let mut content_encoding: Option<&Value> = None;

    for (key, value) in map {
        match key.as_str() {
            names::SPECVERSION => {}
            "data" => data = Some(value),
            "data_base64" => match version {
                SpecVersion::V1 => data_base64 = Some(value),
                SpecVersion::V03 => {
                    return Err(ReadError::UnknownAttribute {
                        name: key.clone(),
                        version: version.as_str(),
                    });
                }
            },
            names::DATACONTENTENCODING if version == SpecVersion::V03 => {
                content_encoding = Some(value);
            }
            name if version.attribute(name).is_some() => {
                let text = value.as_str().ok_or_else(|| {
                    let kind = version
                        .attribute(name)
                        .map(|(_, kind)| kind)
                        .unwrap_or(AttributeKind::String);
                    ReadError::invalid_attribute(name, kind, describe(value))
                })?;
                builder.set_attribute(name, AttributeValue::from(text))?;
            }
            name => {
                builder.set_extension(name, extension_value(name, value)?)?;
            }
        }
    }

    let payload = resolve_data(version, data, data_base64, content_encoding, &mut builder)?;
    if let Some(payload) = payload {
        builder.set_data(payload);
    }
    builder.build()
}

/// Resolves the `data` / `data_base64` / `datacontentencoding` members
/// into a payload, pushing a non-base64 `datacontentencoding` back into
/// the builder as a plain attribute.
fn resolve_data(
    version: SpecVersion,
    data: Option<&Value>,
    data_base64: Option<&Value>,
    content_encoding: Option<&Value>,
    builder: &mut ingot_core::EventBuilder,
) -> ReadResult<Option<EventData>> {
    if let Some(encoding) = content_encoding {
        let encoding = encoding.as_str().ok_or_else(|| {
            ReadError::invalid_attribute(
                names::DATACONTENTENCODING,
                AttributeKind::String,
                describe(encoding),
            )
        })?;
        if encoding == "base64" {
            // The marker describes the wire form only; decode and drop it.
            return match data {
                None => Ok(None),
                Some(Value::String(s)) => Ok(Some(EventData::binary(decode_base64("data", s)?))),
                Some(other) => Err(ReadError::invalid_attribute(
                    "data",
                    AttributeKind::Binary,
                    describe(other),
                )),
            };
        }
        builder.set_attribute(
            names::DATACONTENTENCODING,
            AttributeValue::from(encoding),
        )?;
    }

    if version == SpecVersion::V1 {
        if let Some(encoded) = data_base64 {
            if data.is_some() {
                return Err(ReadError::malformed(
                    "both data and data_base64 are present",
                ));
            }
            let encoded = encoded.as_str().ok_or_else(|| {
                ReadError::invalid_attribute(
                    "data_base64",
                    AttributeKind::Binary,
                    describe(encoded),
                )
            })?;
            return Ok(Some(EventData::binary(decode_base64(
                "data_base64",
                encoded,
            )?)));
        }
    }

    match data {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(EventData::text(s.as_str()))),
        Some(other) => {
            let bytes = serde_json::to_vec(other)
                .map_err(|e| ReadError::malformed(format!("unserializable data member: {e}")))?;
            Ok(Some(EventData::binary(bytes)))
        }
    }
}

fn decode_base64(name: &'static str, encoded: &str) -> ReadResult<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| {
            ReadError::invalid_attribute(
                name,
                AttributeKind::Binary,
                format!("string {encoded:?} is not valid base64"),
            )
        })
}
