//! Context attributes for spec version 0.3.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use crate::error::{ReadResult, WriteResult};
use crate::event::spec_version::names;
use crate::event::value::AttributeValue;
use crate::event::{require, take_text, take_time};
use crate::rw::AttributeWriter;

/// The fixed context attribute set of a version 0.3 event.
///
/// Differs from 1.0 in carrying `schemaurl` (instead of `dataschema`)
/// and the optional `datacontentencoding`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributesV03 {
    pub(crate) id: Arc<str>,
    pub(crate) source: Arc<str>,
    pub(crate) ty: Arc<str>,
    pub(crate) datacontenttype: Option<Arc<str>>,
    pub(crate) datacontentencoding: Option<Arc<str>>,
    pub(crate) schemaurl: Option<Arc<str>>,
    pub(crate) subject: Option<Arc<str>>,
    pub(crate) time: Option<DateTime<FixedOffset>>,
}

impl AttributesV03 {
    pub(crate) fn from_map(mut map: BTreeMap<&'static str, AttributeValue>) -> ReadResult<Self> {
        let attributes = Self {
            id: require(take_text(&mut map, names::ID)?, names::ID)?,
            source: require(take_text(&mut map, names::SOURCE)?, names::SOURCE)?,
            ty: require(take_text(&mut map, names::TYPE)?, names::TYPE)?,
            datacontenttype: take_text(&mut map, names::DATACONTENTTYPE)?,
            datacontentencoding: take_text(&mut map, names::DATACONTENTENCODING)?,
            schemaurl: take_text(&mut map, names::SCHEMAURL)?,
            subject: take_text(&mut map, names::SUBJECT)?,
            time: take_time(&mut map, names::TIME)?,
        };
        super::reject_leftovers(map, super::SpecVersion::V03)?;
        Ok(attributes)
    }

    /// Looks up a context attribute by name.
    pub fn attribute(&self, name: &str) -> Option<AttributeValue> {
        match name {
            names::ID => Some(AttributeValue::String(self.id.clone())),
            names::SOURCE => Some(AttributeValue::Uri(self.source.clone())),
            names::TYPE => Some(AttributeValue::String(self.ty.clone())),
            names::DATACONTENTTYPE => self
                .datacontenttype
                .clone()
                .map(AttributeValue::String),
            names::DATACONTENTENCODING => self
                .datacontentencoding
                .clone()
                .map(AttributeValue::String),
            names::SCHEMAURL => self.schemaurl.clone().map(AttributeValue::Uri),
            names::SUBJECT => self.subject.clone().map(AttributeValue::String),
            names::TIME => self.time.map(AttributeValue::Time),
            _ => None,
        }
    }

    pub(crate) fn visit<W: AttributeWriter + ?Sized>(&self, writer: &mut W) -> WriteResult<()> {
        writer.set_attribute(names::ID, AttributeValue::String(self.id.clone()))?;
        writer.set_attribute(names::SOURCE, AttributeValue::Uri(self.source.clone()))?;
        writer.set_attribute(names::TYPE, AttributeValue::String(self.ty.clone()))?;
        if let Some(ct) = &self.datacontenttype {
            writer.set_attribute(names::DATACONTENTTYPE, AttributeValue::String(ct.clone()))?;
        }
        if let Some(dce) = &self.datacontentencoding {
            writer.set_attribute(
                names::DATACONTENTENCODING,
                AttributeValue::String(dce.clone()),
            )?;
        }
        if let Some(schema) = &self.schemaurl {
            writer.set_attribute(names::SCHEMAURL, AttributeValue::Uri(schema.clone()))?;
        }
        if let Some(subject) = &self.subject {
            writer.set_attribute(names::SUBJECT, AttributeValue::String(subject.clone()))?;
        }
        if let Some(time) = &self.time {
            writer.set_attribute(names::TIME, AttributeValue::Time(*time))?;
        }
        Ok(())
    }
}
