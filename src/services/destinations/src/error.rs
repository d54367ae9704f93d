//! Error handling module for the destination mapper
//!
//! Field mapping itself never fails: an unresolved field is simply left out
//! of the payload. The errors here come from the edges around it, such as
//! loading configuration, picking a destination, or accepting a raw event.

use destination_shared::SharedError;
use thiserror::Error;

/// Result type alias for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;

/// Error types for the destination mapper
#[derive(Error, Debug)]
pub enum MappingError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Configuration source errors (environment, files)
    #[error("Configuration source error: {source}")]
    ConfigSource {
        #[from]
        source: config::ConfigError,
    },

    /// No mapper is registered under the requested name
    #[error("Unknown destination: {destination}")]
    UnknownDestination { destination: String },

    /// The destination exists but is switched off in configuration
    #[error("Destination disabled: {destination}")]
    DestinationDisabled { destination: String },

    /// The destination has no mapping for this event type
    #[error("{destination} does not support {event_type} events")]
    UnsupportedEvent {
        destination: String,
        event_type: String,
    },

    /// The raw event could not be read as an analytics event
    #[error("Invalid event: {source}")]
    InvalidEvent {
        #[from]
        source: SharedError,
    },

    /// Serialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl MappingError {
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn unknown_destination<S: Into<String>>(destination: S) -> Self {
        Self::UnknownDestination {
            destination: destination.into(),
        }
    }

    pub fn destination_disabled<S: Into<String>>(destination: S) -> Self {
        Self::DestinationDisabled {
            destination: destination.into(),
        }
    }

    pub fn unsupported_event<S1: Into<String>, S2: Into<String>>(
        destination: S1,
        event_type: S2,
    ) -> Self {
        Self::UnsupportedEvent {
            destination: destination.into(),
            event_type: event_type.into(),
        }
    }

    /// Stable error code for callers that report failures upstream
    pub fn error_code(&self) -> &'static str {
        match self {
            MappingError::Configuration { .. } => "CONFIGURATION_ERROR",
            MappingError::ConfigSource { .. } => "CONFIGURATION_SOURCE_ERROR",
            MappingError::UnknownDestination { .. } => "UNKNOWN_DESTINATION",
            MappingError::DestinationDisabled { .. } => "DESTINATION_DISABLED",
            MappingError::UnsupportedEvent { .. } => "UNSUPPORTED_EVENT",
            MappingError::InvalidEvent { .. } => "INVALID_EVENT",
            MappingError::Serialization { .. } => "SERIALIZATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = MappingError::unknown_destination("Intercom");
        assert_eq!(error.to_string(), "Unknown destination: Intercom");
        assert_eq!(error.error_code(), "UNKNOWN_DESTINATION");
    }

    #[test]
    fn test_unsupported_event_error() {
        let error = MappingError::unsupported_event("Help Scout", "track");
        assert_eq!(error.to_string(), "Help Scout does not support track events");
        assert_eq!(error.error_code(), "UNSUPPORTED_EVENT");
    }

    #[test]
    fn test_shared_error_conversion() {
        let error: MappingError = SharedError::non_traversable("number").into();
        assert_eq!(error.error_code(), "INVALID_EVENT");
        assert!(error.to_string().contains("not traversable"));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: MappingError = source.into();
        assert_eq!(error.error_code(), "SERIALIZATION_ERROR");
    }
}
