//! The attribute visitor protocol.
//!
//! Two small paired capabilities connect any event source to any event
//! target without either side naming the other's concrete type:
//!
//! - The **push side**: a target implements [`AttributeWriter`] (one
//!   call per set attribute, one per extension) and [`EventWriter`]
//!   (terminal `end`/`end_with_data` yielding the populated target).
//!   Any event pushes itself in via [`Event::write_to`].
//! - The **pull side**: a source walks its own representation and feeds
//!   an [`EventBuilder`](crate::event::EventBuilder) through its
//!   protocol setters, finishing with `build()`.
//!
//! ```text
//! Event ──write_to──▶ impl EventWriter   (format serializer, header writer, …)
//! transport slots ──set_attribute/set_extension──▶ EventBuilder ──build──▶ Event
//! ```
//!
//! Visitation order is unspecified; each attribute is visited at most
//! once per visit. A writer refusal aborts the whole visit — partial
//! targets are never valid output.

use crate::error::WriteResult;
use crate::event::data::EventData;
use crate::event::value::AttributeValue;

/// Write capability for event attributes.
///
/// Implementations may refuse a value (unrepresentable kind, transport
/// limit) by returning a [`WriteError`](crate::error::WriteError) naming
/// the attribute; the caller must abort the visit and discard the target.
pub trait AttributeWriter {
    /// Sets a context attribute. Called only for attributes that are set.
    fn set_attribute(&mut self, name: &str, value: AttributeValue) -> WriteResult<()>;

    /// Sets an extension attribute.
    fn set_extension(&mut self, name: &str, value: AttributeValue) -> WriteResult<()>;
}

/// Terminal write capability: consumes the writer and yields the
/// populated target representation.
pub trait EventWriter: AttributeWriter {
    /// The populated target produced by a successful visit.
    type Output;

    /// Finishes the visit with a data payload. Called at most once.
    fn end_with_data(self, data: EventData) -> WriteResult<Self::Output>
    where
        Self: Sized;

    /// Finishes the visit without data.
    fn end(self) -> WriteResult<Self::Output>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WriteError;
    use crate::event::Event;

    /// Test double recording every visit.
    #[derive(Default)]
    struct Recorder {
        attributes: Vec<(String, String)>,
        extensions: Vec<(String, String)>,
        refuse: Option<&'static str>,
    }

    impl AttributeWriter for Recorder {
        fn set_attribute(&mut self, name: &str, value: AttributeValue) -> WriteResult<()> {
            if self.refuse == Some(name) {
                return Err(WriteError::unsupported(name, "refused by test writer"));
            }
            self.attributes
                .push((name.to_string(), value.to_wire_string()));
            Ok(())
        }

        fn set_extension(&mut self, name: &str, value: AttributeValue) -> WriteResult<()> {
            self.extensions
                .push((name.to_string(), value.to_wire_string()));
            Ok(())
        }
    }

    impl EventWriter for Recorder {
        type Output = (Vec<(String, String)>, Vec<(String, String)>, Option<Vec<u8>>);

        fn end_with_data(self, data: EventData) -> WriteResult<Self::Output> {
            Ok((
                self.attributes,
                self.extensions,
                Some(data.to_bytes().to_vec()),
            ))
        }

        fn end(self) -> WriteResult<Self::Output> {
            Ok((self.attributes, self.extensions, None))
        }
    }

    #[test]
    fn test_absent_optionals_are_never_visited() {
        let event = Event::v1().id("a").source("/s").ty("t").build().unwrap();
        let (attributes, extensions, data) = event.write_to(Recorder::default()).unwrap();
        let names: Vec<&str> = attributes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["specversion", "id", "source", "type"]);
        assert!(extensions.is_empty());
        assert!(data.is_none());
    }

    #[test]
    fn test_full_visit_covers_extensions_and_data() {
        let event = Event::v1()
            .id("a")
            .source("/s")
            .ty("t")
            .subject("sub")
            .extension("flag", true)
            .extension("count", 3)
            .data("payload")
            .build()
            .unwrap();
        let (attributes, extensions, data) = event.write_to(Recorder::default()).unwrap();
        assert!(attributes.contains(&("subject".into(), "sub".into())));
        assert!(extensions.contains(&("flag".into(), "true".into())));
        assert!(extensions.contains(&("count".into(), "3".into())));
        assert_eq!(data, Some(b"payload".to_vec()));
    }

    #[test]
    fn test_writer_refusal_aborts_the_visit() {
        let event = Event::v1().id("a").source("/s").ty("t").build().unwrap();
        let err = event
            .write_to(Recorder {
                refuse: Some("source"),
                ..Recorder::default()
            })
            .unwrap_err();
        assert_eq!(
            err,
            WriteError::UnsupportedType {
                name: "source".into(),
                reason: "refused by test writer".into(),
            }
        );
    }
}
