//! Typed extension attributes and their process-wide registry.
//!
//! An extension is a named, typed view over one or more of an event's
//! extension attributes, with a two-way contract: it can populate itself
//! from an event and push itself back through the attribute writer
//! surface. Concrete extensions are pluggable collaborators; the codec
//! only knows this contract.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{ReadResult, WriteResult};
use crate::event::Event;
use crate::rw::AttributeWriter;

/// A typed extension value with a read/write contract.
pub trait Extension: Send + Sync + 'static {
    /// Populates this extension from the event's attributes.
    ///
    /// Fails if a required sub-attribute is missing or malformed,
    /// naming the offending attribute.
    fn read_from(&mut self, event: &Event) -> ReadResult<()>;

    /// Pushes this extension's attributes into a writer.
    fn write_to(&self, writer: &mut dyn AttributeWriter) -> WriteResult<()>;
}

type ResolveFn = Arc<dyn Fn(&Event) -> ReadResult<Box<dyn Any + Send + Sync>> + Send + Sync>;

/// Maps extension types to factories that extract them from events.
///
/// Long-lived shared state: registration is expected to be rare
/// (startup), lookups frequent and concurrent. Registration is
/// last-writer-wins, so test doubles and late overrides need no
/// unregister step.
///
/// Hosts normally construct one registry and pass it by reference; the
/// [`default_registry`] is a convenience wrapper for applications that
/// want a single process-wide instance.
#[derive(Default)]
pub struct ExtensionRegistry {
    factories: RwLock<HashMap<TypeId, ResolveFn>>,
}

impl ExtensionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `E`, constructed through its `Default` impl.
    pub fn register<E: Extension + Default>(&self) {
        self.register_with(E::default);
    }

    /// Registers `E` with an explicit factory, replacing any previous
    /// registration for the same type.
    pub fn register_with<E: Extension>(&self, factory: impl Fn() -> E + Send + Sync + 'static) {
        let resolve: ResolveFn = Arc::new(move |event| {
            let mut extension = factory();
            extension.read_from(event)?;
            Ok(Box::new(extension))
        });
        let replaced = self
            .factories
            .write()
            .insert(TypeId::of::<E>(), resolve)
            .is_some();
        debug!(
            extension = std::any::type_name::<E>(),
            replaced, "extension factory registered"
        );
    }

    /// Extracts a registered extension from an event.
    ///
    /// Returns `Ok(None)` when no factory is registered for `E` — an
    /// explicit absent result the caller decides how to treat. Returns
    /// an error only when the extension's read contract fails.
    pub fn resolve<E: Extension>(&self, event: &Event) -> ReadResult<Option<E>> {
        let factory = self.factories.read().get(&TypeId::of::<E>()).cloned();
        match factory {
            None => Ok(None),
            Some(resolve) => {
                let boxed = resolve(event)?;
                // Keyed by TypeId::of::<E>, so the downcast cannot fail.
                Ok(boxed.downcast::<E>().ok().map(|e| *e))
            }
        }
    }
}

/// The process-wide default registry.
pub fn default_registry() -> &'static ExtensionRegistry {
    static REGISTRY: Lazy<ExtensionRegistry> = Lazy::new(ExtensionRegistry::new);
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReadError;
    use crate::event::value::AttributeValue;

    /// Trace context carried in `traceparent`/`tracestate` extensions.
    #[derive(Debug, Clone, Default, PartialEq)]
    struct TraceContext {
        parent: String,
        state: Option<String>,
    }

    impl Extension for TraceContext {
        fn read_from(&mut self, event: &Event) -> ReadResult<()> {
            self.parent = event
                .extension("traceparent")
                .and_then(|v| v.as_str())
                .ok_or(ReadError::MissingAttribute {
                    name: "traceparent",
                })?
                .to_string();
            self.state = event
                .extension("tracestate")
                .and_then(|v| v.as_str())
                .map(str::to_owned);
            Ok(())
        }

        fn write_to(&self, writer: &mut dyn AttributeWriter) -> WriteResult<()> {
            writer.set_extension("traceparent", AttributeValue::from(self.parent.as_str()))?;
            if let Some(state) = &self.state {
                writer.set_extension("tracestate", AttributeValue::from(state.as_str()))?;
            }
            Ok(())
        }
    }

    fn traced_event() -> Event {
        Event::v1()
            .id("a")
            .source("/s")
            .ty("t")
            .extension("traceparent", "00-abc-def-01")
            .build()
            .unwrap()
    }

    #[test]
    fn test_resolve_round_trips_through_the_read_contract() {
        let registry = ExtensionRegistry::new();
        registry.register::<TraceContext>();

        let resolved = registry.resolve::<TraceContext>(&traced_event()).unwrap();
        assert_eq!(
            resolved,
            Some(TraceContext {
                parent: "00-abc-def-01".into(),
                state: None,
            })
        );
    }

    #[test]
    fn test_unregistered_extension_is_absent_not_an_error() {
        let registry = ExtensionRegistry::new();
        assert_eq!(registry.resolve::<TraceContext>(&traced_event()).unwrap(), None);
    }

    #[test]
    fn test_failed_read_contract_propagates() {
        let registry = ExtensionRegistry::new();
        registry.register::<TraceContext>();

        let untraced = Event::v1().id("a").source("/s").ty("t").build().unwrap();
        let err = registry.resolve::<TraceContext>(&untraced).unwrap_err();
        assert_eq!(
            err,
            ReadError::MissingAttribute {
                name: "traceparent"
            }
        );
    }

    #[test]
    fn test_registration_is_last_writer_wins() {
        let registry = ExtensionRegistry::new();
        registry.register::<TraceContext>();
        registry.register_with(|| TraceContext {
            parent: "override".into(),
            state: None,
        });

        // The second factory's read contract still runs, but overwriting
        // the first registration raised no error.
        let resolved = registry.resolve::<TraceContext>(&traced_event()).unwrap();
        assert_eq!(resolved.unwrap().parent, "00-abc-def-01");
    }
}
