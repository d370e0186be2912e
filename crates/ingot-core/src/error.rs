//! Unified error types for the Ingot codec core.
//!
//! Errors are split by phase: [`ReadError`] for everything that can go wrong
//! while turning a transport message into an event, [`WriteError`] for the
//! reverse direction. Every variant that concerns a single attribute carries
//! the offending attribute name so callers can act on it.

use thiserror::Error;

use crate::event::value::AttributeKind;

// =============================================================================
// Read Errors
// =============================================================================

/// Errors that can occur while reading a message into an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// The message metadata resolves to no known encoding.
    ///
    /// Neither a structured content type nor a spec version hint was found.
    #[error("message has no recognizable encoding")]
    UnknownEncoding,

    /// A spec version hint was present but names an unsupported version.
    #[error("unsupported spec version: {found}")]
    UnsupportedSpecVersion {
        /// The version string found in the message.
        found: String,
    },

    /// The payload shape does not match the expected framing.
    ///
    /// Distinct and catchable: a caller reading a batch may retry the
    /// payload once under the alternate single-event shape.
    #[error("payload shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// The shape the reader expected.
        expected: &'static str,
        /// The shape actually found.
        actual: String,
    },

    /// A required context attribute was never set.
    #[error("missing required attribute '{name}'")]
    MissingAttribute {
        /// Name of the missing attribute.
        name: &'static str,
    },

    /// A present attribute failed to coerce to its declared value kind.
    #[error("invalid value for attribute '{name}': expected {expected}, got {actual}")]
    InvalidAttribute {
        /// Name of the offending attribute.
        name: String,
        /// The value kind the attribute is declared with.
        expected: AttributeKind,
        /// Description of the value actually found.
        actual: String,
    },

    /// An attribute name is not part of the context set for this spec version.
    #[error("spec version {version} has no attribute named '{name}'")]
    UnknownAttribute {
        /// The unrecognized attribute name.
        name: String,
        /// The spec version string being read.
        version: &'static str,
    },

    /// An extension name collides with a context attribute name.
    #[error("extension name '{name}' collides with a context attribute")]
    ExtensionCollision {
        /// The colliding name.
        name: String,
    },

    /// The payload could not be parsed at all.
    #[error("malformed payload: {reason}")]
    Malformed {
        /// Reason for failure.
        reason: String,
    },
}

impl ReadError {
    /// Creates a malformed-payload error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// Creates an invalid-attribute error.
    pub fn invalid_attribute(
        name: impl Into<String>,
        expected: AttributeKind,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            name: name.into(),
            expected,
            actual: actual.into(),
        }
    }
}

// =============================================================================
// Write Errors
// =============================================================================

/// Errors that can occur while writing an event into a target representation.
///
/// A writer error aborts the whole visit; the partially populated target is
/// discarded by the caller and never observable as valid output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// The target representation cannot carry this attribute's value kind.
    #[error("attribute '{name}' has a value kind the target cannot represent: {reason}")]
    UnsupportedType {
        /// Name of the refused attribute.
        name: String,
        /// Reason for refusal.
        reason: String,
    },

    /// The attribute value exceeds a transport-imposed limit.
    #[error("attribute '{name}' exceeds a transport limit: {reason}")]
    LimitExceeded {
        /// Name of the refused attribute.
        name: String,
        /// Description of the violated limit.
        reason: String,
    },

    /// Payload serialization failed.
    #[error("failed to encode payload: {reason}")]
    Encode {
        /// Reason for failure.
        reason: String,
    },
}

impl WriteError {
    /// Creates an unsupported-type rejection for the named attribute.
    pub fn unsupported(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedType {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an encode failure.
    pub fn encode(reason: impl Into<String>) -> Self {
        Self::Encode {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for read operations.
pub type ReadResult<T> = Result<T, ReadError>;

/// Result type for write operations.
pub type WriteResult<T> = Result<T, WriteError>;
