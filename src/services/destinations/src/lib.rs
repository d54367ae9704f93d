//! # Destination Mapper
//!
//! Translates generic analytics events into the JSON bodies expected by
//! downstream destination APIs.
//!
//! ## Destinations
//!
//! - **Help Scout**: customer updates built from identify events, including
//!   address, phone and website folding
//! - **Outbound**: identify and track bodies for protocol v1 (legacy flat
//!   schema) and v2 (promoted traits and push token routing)
//!
//! Mapping is pure and synchronous. Unresolvable fields are left out of the
//! payload rather than reported as errors; delivery, retries and credential
//! storage belong to the caller.
//!
//! ## Usage
//!
//! ```rust
//! use destination_mapper::{DestinationDispatcher, MapperConfig};
//! use serde_json::json;
//!
//! let dispatcher = DestinationDispatcher::new(&MapperConfig::default());
//! let request = dispatcher
//!     .dispatch_raw(
//!         "Help Scout",
//!         json!({"type": "identify", "traits": {"email": "ada@example.com"}}),
//!     )
//!     .unwrap();
//! assert_eq!(request.body["emails"], json!([{"value": "ada@example.com"}]));
//! ```

pub mod config;
pub mod destinations;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod models;
pub mod telemetry;

// Re-export main types for easier usage
pub use crate::config::{MapperConfig, ObservabilityConfig, OutboundSettings, ProtocolVersion};
pub use destinations::{Destination, DestinationFactory, DestinationMapper};
pub use dispatcher::{DestinationDispatcher, DestinationRequest};
pub use error::{MappingError, MappingResult};
pub use metrics::{MappingMetrics, MetricsSnapshot};
pub use models::{
    ContactUpdatePayload, IdentifyMessagePayload, Operation, TrackMessagePayload,
};

/// Version information for the destination mapper
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVICE_NAME: &str = "destination-mapper";
