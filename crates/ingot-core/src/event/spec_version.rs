//! Spec version identifiers and their context-attribute tables.

use std::fmt;
use std::str::FromStr;

use crate::error::ReadError;
use crate::event::value::AttributeKind;

/// Canonical context attribute names shared across spec versions.
pub mod names {
    pub const SPECVERSION: &str = "specversion";
    pub const ID: &str = "id";
    pub const SOURCE: &str = "source";
    pub const TYPE: &str = "type";
    pub const DATACONTENTTYPE: &str = "datacontenttype";
    pub const DATASCHEMA: &str = "dataschema";
    pub const SCHEMAURL: &str = "schemaurl";
    pub const DATACONTENTENCODING: &str = "datacontentencoding";
    pub const SUBJECT: &str = "subject";
    pub const TIME: &str = "time";
}

/// Context attributes required on every event regardless of version.
pub const REQUIRED_ATTRIBUTES: &[&str] = &[names::ID, names::SOURCE, names::TYPE];

const V03_ATTRIBUTES: &[(&str, AttributeKind)] = &[
    (names::SPECVERSION, AttributeKind::String),
    (names::ID, AttributeKind::String),
    (names::SOURCE, AttributeKind::Uri),
    (names::TYPE, AttributeKind::String),
    (names::DATACONTENTTYPE, AttributeKind::String),
    (names::DATACONTENTENCODING, AttributeKind::String),
    (names::SCHEMAURL, AttributeKind::Uri),
    (names::SUBJECT, AttributeKind::String),
    (names::TIME, AttributeKind::Time),
];

const V1_ATTRIBUTES: &[(&str, AttributeKind)] = &[
    (names::SPECVERSION, AttributeKind::String),
    (names::ID, AttributeKind::String),
    (names::SOURCE, AttributeKind::Uri),
    (names::TYPE, AttributeKind::String),
    (names::DATACONTENTTYPE, AttributeKind::String),
    (names::DATASCHEMA, AttributeKind::Uri),
    (names::SUBJECT, AttributeKind::String),
    (names::TIME, AttributeKind::Time),
];

/// The envelope spec version an event conforms to.
///
/// The version selects which context attributes are legal and which
/// metadata naming convention binary-mode adapters use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecVersion {
    /// Version 0.3.
    V03,
    /// Version 1.0.
    V1,
}

impl SpecVersion {
    /// Returns the wire identifier for this version.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SpecVersion::V03 => "0.3",
            SpecVersion::V1 => "1.0",
        }
    }

    /// Returns the context attribute names legal for this version.
    pub fn attribute_names(&self) -> impl Iterator<Item = &'static str> {
        self.table().iter().map(|(name, _)| *name)
    }

    /// Looks up a context attribute by name.
    ///
    /// Returns the canonical (static) name and the declared value kind,
    /// or `None` if the name is not a context attribute of this version.
    pub fn attribute(&self, name: &str) -> Option<(&'static str, AttributeKind)> {
        self.table()
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(n, k)| (*n, *k))
    }

    fn table(&self) -> &'static [(&'static str, AttributeKind)] {
        match self {
            SpecVersion::V03 => V03_ATTRIBUTES,
            SpecVersion::V1 => V1_ATTRIBUTES,
        }
    }
}

impl FromStr for SpecVersion {
    type Err = ReadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0.3" => Ok(SpecVersion::V03),
            "1.0" => Ok(SpecVersion::V1),
            other => Err(ReadError::UnsupportedSpecVersion {
                found: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("1.0".parse::<SpecVersion>().unwrap(), SpecVersion::V1);
        assert_eq!("0.3".parse::<SpecVersion>().unwrap(), SpecVersion::V03);
        assert_eq!(SpecVersion::V1.to_string(), "1.0");
    }

    #[test]
    fn test_unknown_version_is_reported() {
        let err = "2.0".parse::<SpecVersion>().unwrap_err();
        assert_eq!(
            err,
            ReadError::UnsupportedSpecVersion {
                found: "2.0".into()
            }
        );
    }

    #[test]
    fn test_attribute_tables_differ_by_version() {
        assert!(SpecVersion::V1.attribute("dataschema").is_some());
        assert!(SpecVersion::V1.attribute("schemaurl").is_none());
        assert!(SpecVersion::V03.attribute("schemaurl").is_some());
        assert!(SpecVersion::V03.attribute("datacontentencoding").is_some());
        assert!(SpecVersion::V03.attribute("dataschema").is_none());
    }

    #[test]
    fn test_attribute_lookup_returns_kind() {
        let (name, kind) = SpecVersion::V1.attribute("time").unwrap();
        assert_eq!(name, "time");
        assert_eq!(kind, AttributeKind::Time);
    }
}
