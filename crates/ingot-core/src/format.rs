//! Structured format abstraction.
//!
//! A structured format turns a whole event (or a batch of events) into a
//! single self-describing payload and back. Formats are identified by
//! media type; the codec core never references a concrete format type.

use std::fmt;
use std::sync::Arc;

use crate::batch::EventBatch;
use crate::error::{ReadResult, WriteResult};
use crate::event::Event;

/// A structured encoding of events, keyed by media type.
pub trait EventFormat: Send + Sync {
    /// Media type of a single-event payload.
    fn media_type(&self) -> &'static str;

    /// Media type of a batch payload.
    fn batch_media_type(&self) -> &'static str;

    /// Serializes one event into a self-describing payload.
    fn serialize(&self, event: &Event) -> WriteResult<Vec<u8>>;

    /// Serializes a batch of events into a single payload.
    fn serialize_batch(&self, batch: &EventBatch) -> WriteResult<Vec<u8>>;

    /// Deserializes a single-event payload.
    fn deserialize(&self, payload: &[u8]) -> ReadResult<Event>;

    /// Deserializes a batch payload.
    ///
    /// A single-event payload must also deserialize here, as a
    /// one-element batch.
    fn deserialize_batch(&self, payload: &[u8]) -> ReadResult<EventBatch>;
}

/// An explicit format table, resolved by content type.
///
/// Constructed once by the host application and passed by reference into
/// read paths; there is deliberately no process-wide format table.
#[derive(Clone, Default)]
pub struct Formats {
    formats: Vec<Arc<dyn EventFormat>>,
}

impl Formats {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a format to the table.
    pub fn register(&mut self, format: Arc<dyn EventFormat>) {
        self.formats.push(format);
    }

    /// Adds a format, builder-style.
    pub fn with(mut self, format: Arc<dyn EventFormat>) -> Self {
        self.register(format);
        self
    }

    /// Resolves a content type (parameters ignored) to a format whose
    /// single-event or batch media type matches.
    pub fn resolve(&self, content_type: &str) -> Option<Arc<dyn EventFormat>> {
        let essence = media_type_essence(content_type);
        self.formats
            .iter()
            .find(|f| f.media_type() == essence || f.batch_media_type() == essence)
            .cloned()
    }
}

impl fmt::Debug for Formats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.formats.iter().map(|fmt| fmt.media_type()))
            .finish()
    }
}

/// Strips media type parameters (`; charset=...`) and surrounding space.
pub fn media_type_essence(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}
