//! Error types for the shared event model
//!
//! The event model only fails when the raw input cannot be treated as an
//! event at all. Missing fields are never errors.

use thiserror::Error;

/// Result type alias for shared event operations
pub type SharedResult<T> = Result<T, SharedError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// The event root is a scalar and cannot be walked
    #[error("Event root is not traversable: found {kind}")]
    NonTraversableRoot { kind: String },

    /// The `type` field names something other than identify or track
    #[error("Unsupported event type: {event_type}")]
    UnsupportedEventType { event_type: String },
}

impl SharedError {
    pub fn non_traversable<S: Into<String>>(kind: S) -> Self {
        Self::NonTraversableRoot { kind: kind.into() }
    }

    pub fn unsupported_event_type<S: Into<String>>(event_type: S) -> Self {
        Self::UnsupportedEventType {
            event_type: event_type.into(),
        }
    }
}
