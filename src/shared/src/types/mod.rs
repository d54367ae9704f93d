//! Shared type definitions for the destination mapping layer

pub mod analytics;

pub use analytics::{AnalyticsEvent, EventFacade, Identify, Track};
