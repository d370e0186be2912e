//! Event construction: the pull side of the read/write protocol.
//!
//! An [`EventBuilder`] accumulates attributes until the terminal
//! [`build`](EventBuilder::build) call. It offers two surfaces:
//!
//! - Fluent, typed setters (`id`, `source`, `ty`, …) for host
//!   applications constructing events directly. These never fail;
//!   validation happens at `build()`.
//! - Fallible protocol setters ([`set_attribute`](EventBuilder::set_attribute),
//!   [`set_extension`](EventBuilder::set_extension)) for message readers
//!   pulling attributes out of a transport representation. These coerce
//!   and validate eagerly so the error can name the offending slot.
//!
//! Builders are per-operation values: construct one, fill it, build or
//! drop it. A dropped builder leaves no partial state behind.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use crate::error::{ReadError, ReadResult};
use crate::event::spec_version::names;
use crate::event::v03::AttributesV03;
use crate::event::v1::AttributesV1;
use crate::event::value::AttributeValue;
use crate::event::{Attributes, Event, EventData, SpecVersion};

/// Accumulates event state until [`build`](EventBuilder::build).
#[derive(Debug, Clone)]
pub struct EventBuilder {
    version: SpecVersion,
    attributes: BTreeMap<&'static str, AttributeValue>,
    extensions: BTreeMap<String, AttributeValue>,
    data: Option<EventData>,
}

impl EventBuilder {
    pub(crate) fn new(version: SpecVersion) -> Self {
        Self {
            version,
            attributes: BTreeMap::new(),
            extensions: BTreeMap::new(),
            data: None,
        }
    }

    /// The spec version this builder targets.
    pub fn version(&self) -> SpecVersion {
        self.version
    }

    // =========================================================================
    // Fluent setters
    // =========================================================================

    /// Sets the `id` attribute.
    pub fn id(mut self, id: impl Into<Arc<str>>) -> Self {
        self.attributes
            .insert(names::ID, AttributeValue::String(id.into()));
        self
    }

    /// Sets the `source` attribute.
    pub fn source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.attributes
            .insert(names::SOURCE, AttributeValue::Uri(source.into()));
        self
    }

    /// Sets the `type` attribute.
    pub fn ty(mut self, ty: impl Into<Arc<str>>) -> Self {
        self.attributes
            .insert(names::TYPE, AttributeValue::String(ty.into()));
        self
    }

    /// Sets the `datacontenttype` attribute.
    pub fn datacontenttype(mut self, content_type: impl Into<Arc<str>>) -> Self {
        self.attributes.insert(
            names::DATACONTENTTYPE,
            AttributeValue::String(content_type.into()),
        );
        self
    }

    /// Sets the schema reference attribute.
    ///
    /// Stored as `dataschema` for 1.0 builders and `schemaurl` for 0.3
    /// builders.
    pub fn dataschema(mut self, schema: impl Into<Arc<str>>) -> Self {
        let name = match self.version {
            SpecVersion::V03 => names::SCHEMAURL,
            SpecVersion::V1 => names::DATASCHEMA,
        };
        self.attributes.insert(name, AttributeValue::Uri(schema.into()));
        self
    }

    /// Sets the `subject` attribute.
    pub fn subject(mut self, subject: impl Into<Arc<str>>) -> Self {
        self.attributes
            .insert(names::SUBJECT, AttributeValue::String(subject.into()));
        self
    }

    /// Sets the `time` attribute.
    pub fn time(mut self, time: DateTime<FixedOffset>) -> Self {
        self.attributes.insert(names::TIME, AttributeValue::Time(time));
        self
    }

    /// Adds an extension attribute. Collisions with context attribute
    /// names are reported by `build()`.
    pub fn extension(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.extensions.insert(name.into(), value.into());
        self
    }

    /// Attaches the data payload.
    pub fn data(mut self, data: impl Into<EventData>) -> Self {
        self.data = Some(data.into());
        self
    }

    // =========================================================================
    // Protocol setters
    // =========================================================================

    /// Sets a context attribute by name, coercing the value to the
    /// attribute's declared kind.
    ///
    /// `specversion` is accepted when it matches the builder's version
    /// and rejected otherwise. Repeated sets of the same name are
    /// last-write-wins.
    pub fn set_attribute(&mut self, name: &str, value: AttributeValue) -> ReadResult<()> {
        if name == names::SPECVERSION {
            let found = match value.as_str() {
                Some(s) => s.to_string(),
                None => value.to_wire_string(),
            };
            if found == self.version.as_str() {
                return Ok(());
            }
            return Err(ReadError::UnsupportedSpecVersion { found });
        }
        let (canonical, kind) =
            self.version
                .attribute(name)
                .ok_or_else(|| ReadError::UnknownAttribute {
                    name: name.to_string(),
                    version: self.version.as_str(),
                })?;
        let coerced = value
            .coerce(kind)
            .map_err(|original| ReadError::invalid_attribute(canonical, kind, original.describe()))?;
        self.attributes.insert(canonical, coerced);
        Ok(())
    }

    /// Sets an extension attribute by name.
    ///
    /// Rejects names that collide with a context attribute of the
    /// builder's version. Repeated sets are last-write-wins.
    pub fn set_extension(&mut self, name: &str, value: AttributeValue) -> ReadResult<()> {
        if self.version.attribute(name).is_some() || name == names::SPECVERSION {
            return Err(ReadError::ExtensionCollision {
                name: name.to_string(),
            });
        }
        self.extensions.insert(name.to_string(), value);
        Ok(())
    }

    /// Attaches the data payload without consuming the builder.
    pub fn set_data(&mut self, data: EventData) {
        self.data = Some(data);
    }

    // =========================================================================
    // Terminal
    // =========================================================================

    /// Finishes construction.
    ///
    /// Fails with [`ReadError::MissingAttribute`] if `id`, `source`, or
    /// `type` were never set, and with [`ReadError::ExtensionCollision`]
    /// if a fluently added extension shadows a context attribute.
    pub fn build(self) -> ReadResult<Event> {
        for name in self.extensions.keys() {
            if self.version.attribute(name).is_some() || name == names::SPECVERSION {
                return Err(ReadError::ExtensionCollision { name: name.clone() });
            }
        }
        let attributes = match self.version {
            SpecVersion::V03 => Attributes::V03(AttributesV03::from_map(self.attributes)?),
            SpecVersion::V1 => Attributes::V1(AttributesV1::from_map(self.attributes)?),
        };
        Ok(Event {
            attributes,
            extensions: self.extensions,
            data: self.data,
        })
    }
}
