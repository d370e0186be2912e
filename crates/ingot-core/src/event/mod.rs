//! The immutable event value model.
//!
//! An [`Event`] is a spec-versioned set of context attributes, an open
//! mapping of extension attributes, and an optional opaque payload:
//!
//! ```text
//! Event
//! ├── Attributes        ← fixed, version-specific set
//! │   ├── V03           ← id, source, type, … schemaurl, datacontentencoding
//! │   └── V1            ← id, source, type, … dataschema
//! ├── extensions        ← name → AttributeValue, open set
//! └── data              ← optional EventData
//! ```
//!
//! Events are immutable after construction and cheap to clone (shared
//! string and byte storage). Construction goes through [`EventBuilder`],
//! which is also the pull side of the read/write protocol; the push side
//! is [`Event::write_to`].

pub mod builder;
pub mod data;
pub mod spec_version;
pub mod v03;
pub mod v1;
pub mod value;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use crate::error::{ReadError, ReadResult, WriteResult};
use crate::rw::{AttributeWriter, EventWriter};

pub use builder::EventBuilder;
pub use data::EventData;
pub use spec_version::SpecVersion;
pub use v03::AttributesV03;
pub use v1::AttributesV1;
pub use value::{AttributeKind, AttributeValue};

use spec_version::names;

// =============================================================================
// Context Attributes
// =============================================================================

/// The version-specific context attribute set of an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Attributes {
    V03(AttributesV03),
    V1(AttributesV1),
}

impl Attributes {
    /// Returns the spec version this attribute set belongs to.
    pub fn spec_version(&self) -> SpecVersion {
        match self {
            Attributes::V03(_) => SpecVersion::V03,
            Attributes::V1(_) => SpecVersion::V1,
        }
    }

    fn attribute(&self, name: &str) -> Option<AttributeValue> {
        match self {
            Attributes::V03(a) => a.attribute(name),
            Attributes::V1(a) => a.attribute(name),
        }
    }

    fn visit<W: AttributeWriter + ?Sized>(&self, writer: &mut W) -> WriteResult<()> {
        match self {
            Attributes::V03(a) => a.visit(writer),
            Attributes::V1(a) => a.visit(writer),
        }
    }
}

// =============================================================================
// Event
// =============================================================================

/// One immutable event.
///
/// Equality and hashing cover the closed set {spec version, context
/// attributes, extensions, data bytes} and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
    pub(crate) attributes: Attributes,
    pub(crate) extensions: BTreeMap<String, AttributeValue>,
    pub(crate) data: Option<EventData>,
}

impl Event {
    /// Starts building an event for the given spec version.
    pub fn builder(version: SpecVersion) -> EventBuilder {
        EventBuilder::new(version)
    }

    /// Starts building a version 1.0 event.
    pub fn v1() -> EventBuilder {
        Self::builder(SpecVersion::V1)
    }

    /// Starts building a version 0.3 event.
    pub fn v03() -> EventBuilder {
        Self::builder(SpecVersion::V03)
    }

    /// The spec version of this event.
    pub fn spec_version(&self) -> SpecVersion {
        self.attributes.spec_version()
    }

    /// The `id` attribute.
    pub fn id(&self) -> &str {
        match &self.attributes {
            Attributes::V03(a) => &a.id,
            Attributes::V1(a) => &a.id,
        }
    }

    /// The `source` attribute (a URI-reference).
    pub fn source(&self) -> &str {
        match &self.attributes {
            Attributes::V03(a) => &a.source,
            Attributes::V1(a) => &a.source,
        }
    }

    /// The `type` attribute.
    pub fn ty(&self) -> &str {
        match &self.attributes {
            Attributes::V03(a) => &a.ty,
            Attributes::V1(a) => &a.ty,
        }
    }

    /// The `datacontenttype` attribute, if set.
    pub fn datacontenttype(&self) -> Option<&str> {
        match &self.attributes {
            Attributes::V03(a) => a.datacontenttype.as_deref(),
            Attributes::V1(a) => a.datacontenttype.as_deref(),
        }
    }

    /// The schema reference attribute, if set.
    ///
    /// Maps to `dataschema` on 1.0 events and `schemaurl` on 0.3 events.
    pub fn dataschema(&self) -> Option<&str> {
        match &self.attributes {
            Attributes::V03(a) => a.schemaurl.as_deref(),
            Attributes::V1(a) => a.dataschema.as_deref(),
        }
    }

    /// The `subject` attribute, if set.
    pub fn subject(&self) -> Option<&str> {
        match &self.attributes {
            Attributes::V03(a) => a.subject.as_deref(),
            Attributes::V1(a) => a.subject.as_deref(),
        }
    }

    /// The `time` attribute, if set.
    pub fn time(&self) -> Option<&DateTime<FixedOffset>> {
        match &self.attributes {
            Attributes::V03(a) => a.time.as_ref(),
            Attributes::V1(a) => a.time.as_ref(),
        }
    }

    /// The data payload, if present.
    pub fn data(&self) -> Option<&EventData> {
        self.data.as_ref()
    }

    /// Looks up a context attribute by name, `specversion` included.
    ///
    /// Returns `None` both for unset optionals and for names outside this
    /// version's attribute set.
    pub fn attribute(&self, name: &str) -> Option<AttributeValue> {
        if name == names::SPECVERSION {
            return Some(AttributeValue::String(Arc::from(
                self.spec_version().as_str(),
            )));
        }
        self.attributes.attribute(name)
    }

    /// Looks up an extension attribute by name.
    pub fn extension(&self, name: &str) -> Option<&AttributeValue> {
        self.extensions.get(name)
    }

    /// Iterates over all extension attributes.
    pub fn extensions(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.extensions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Pushes this event into a writer, attribute by attribute.
    ///
    /// Visits `specversion` first, then every set context attribute, then
    /// every extension, and finally terminates the writer with or without
    /// data. Visiting is a pure projection; the first writer refusal
    /// aborts the visit and the partially populated target is dropped.
    pub fn write_to<W: EventWriter>(&self, mut writer: W) -> WriteResult<W::Output> {
        writer.set_attribute(
            names::SPECVERSION,
            AttributeValue::String(Arc::from(self.spec_version().as_str())),
        )?;
        self.attributes.visit(&mut writer)?;
        for (name, value) in &self.extensions {
            writer.set_extension(name, value.clone())?;
        }
        match &self.data {
            Some(data) => writer.end_with_data(data.clone()),
            None => writer.end(),
        }
    }
}

// =============================================================================
// Builder-side extraction helpers
// =============================================================================

pub(crate) fn take_text(
    map: &mut BTreeMap<&'static str, AttributeValue>,
    name: &'static str,
) -> ReadResult<Option<Arc<str>>> {
    match map.remove(name) {
        None => Ok(None),
        Some(AttributeValue::String(s)) | Some(AttributeValue::Uri(s)) => Ok(Some(s)),
        Some(other) => Err(ReadError::invalid_attribute(
            name,
            AttributeKind::String,
            other.describe(),
        )),
    }
}

pub(crate) fn take_time(
    map: &mut BTreeMap<&'static str, AttributeValue>,
    name: &'static str,
) -> ReadResult<Option<DateTime<FixedOffset>>> {
    match map.remove(name) {
        None => Ok(None),
        Some(AttributeValue::Time(t)) => Ok(Some(t)),
        Some(other) => Err(ReadError::invalid_attribute(
            name,
            AttributeKind::Time,
            other.describe(),
        )),
    }
}

pub(crate) fn require(value: Option<Arc<str>>, name: &'static str) -> ReadResult<Arc<str>> {
    value.ok_or(ReadError::MissingAttribute { name })
}

pub(crate) fn reject_leftovers(
    map: BTreeMap<&'static str, AttributeValue>,
    version: SpecVersion,
) -> ReadResult<()> {
    match map.into_iter().next() {
        None => Ok(()),
        Some((name, _)) => Err(ReadError::UnknownAttribute {
            name: name.to_string(),
            version: version.as_str(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn sample() -> Event {
        Event::v1()
            .id("evt-1")
            .source("/sensors/tank-4")
            .ty("com.example.reading")
            .subject("tank-4")
            .extension("trace", "abc123")
            .data(Bytes::from_static(b"{\"level\":7}"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_accessors() {
        let event = sample();
        assert_eq!(event.spec_version(), SpecVersion::V1);
        assert_eq!(event.id(), "evt-1");
        assert_eq!(event.source(), "/sensors/tank-4");
        assert_eq!(event.ty(), "com.example.reading");
        assert_eq!(event.subject(), Some("tank-4"));
        assert_eq!(event.datacontenttype(), None);
        assert_eq!(event.time(), None);
        assert_eq!(event.extension("trace").and_then(|v| v.as_str()), Some("abc123"));
    }

    #[test]
    fn test_attribute_lookup_includes_specversion() {
        let event = sample();
        assert_eq!(
            event.attribute("specversion").and_then(|v| v.as_str().map(str::to_owned)),
            Some("1.0".to_string())
        );
        assert_eq!(event.attribute("id"), Some(AttributeValue::from("evt-1")));
        // Unset optional reads as absent, never as empty.
        assert_eq!(event.attribute("time"), None);
        // Not part of the v1 set at all.
        assert_eq!(event.attribute("schemaurl"), None);
    }

    #[test]
    fn test_equality_covers_the_closed_set() {
        assert_eq!(sample(), sample());

        let different_extension = Event::v1()
            .id("evt-1")
            .source("/sensors/tank-4")
            .ty("com.example.reading")
            .subject("tank-4")
            .extension("trace", "zzz")
            .data(Bytes::from_static(b"{\"level\":7}"))
            .build()
            .unwrap();
        assert_ne!(sample(), different_extension);

        let different_data = Event::v1()
            .id("evt-1")
            .source("/sensors/tank-4")
            .ty("com.example.reading")
            .subject("tank-4")
            .extension("trace", "abc123")
            .data(Bytes::from_static(b"{}"))
            .build()
            .unwrap();
        assert_ne!(sample(), different_data);
    }

    #[test]
    fn test_equality_ignores_data_representation() {
        let text = Event::v1()
            .id("a")
            .source("/s")
            .ty("t")
            .data("payload")
            .build()
            .unwrap();
        let binary = Event::v1()
            .id("a")
            .source("/s")
            .ty("t")
            .data(Bytes::from_static(b"payload"))
            .build()
            .unwrap();
        assert_eq!(text, binary);
    }
}
