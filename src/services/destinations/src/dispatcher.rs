//! # Destination Dispatcher
//!
//! Selects the mapper for a destination by name and runs the incoming event
//! through it. The resulting request is handed back to the caller for
//! delivery; nothing here performs I/O.

use crate::config::MapperConfig;
use crate::destinations::{Destination, DestinationFactory, DestinationMapper};
use crate::error::{MappingError, MappingResult};
use crate::metrics::MappingMetrics;
use crate::models::Operation;
use destination_shared::AnalyticsEvent;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Mapped body ready for the delivery layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationRequest {
    pub destination: Destination,
    pub operation: Operation,
    pub body: Value,
}

/// Routes events to destination mappers
pub struct DestinationDispatcher {
    mappers: HashMap<Destination, Box<dyn DestinationMapper>>,
    metrics: MappingMetrics,
}

impl DestinationDispatcher {
    pub fn new(config: &MapperConfig) -> Self {
        let mappers: HashMap<Destination, Box<dyn DestinationMapper>> = Destination::ALL
            .iter()
            .filter_map(|destination| {
                DestinationFactory::create(*destination, config).map(|mapper| (*destination, mapper))
            })
            .collect();

        info!(
            destinations = mappers.len(),
            outbound_version = %config.outbound.effective_version(),
            "Destination dispatcher initialized"
        );

        Self {
            mappers,
            metrics: MappingMetrics::new(),
        }
    }

    pub fn is_enabled(&self, destination: Destination) -> bool {
        self.mappers.contains_key(&destination)
    }

    pub fn metrics(&self) -> &MappingMetrics {
        &self.metrics
    }

    /// Map `event` for the destination registered under `destination_name`
    pub fn dispatch(
        &self,
        destination_name: &str,
        event: &AnalyticsEvent,
    ) -> MappingResult<DestinationRequest> {
        let destination = Destination::from_name(destination_name).map_err(|e| {
            warn!(destination = destination_name, "No mapper for destination");
            self.metrics.record_failure(None);
            e
        })?;

        self.dispatch_to(destination, event)
    }

    /// Parse a raw event payload and map it for `destination_name`
    pub fn dispatch_raw(
        &self,
        destination_name: &str,
        raw: Value,
    ) -> MappingResult<DestinationRequest> {
        let event = AnalyticsEvent::from_value(raw).map_err(|e| {
            warn!(destination = destination_name, error = %e, "Rejected raw event");
            self.metrics.record_failure(Destination::from_name(destination_name).ok());
            MappingError::from(e)
        })?;

        self.dispatch(destination_name, &event)
    }

    pub fn dispatch_to(
        &self,
        destination: Destination,
        event: &AnalyticsEvent,
    ) -> MappingResult<DestinationRequest> {
        let result = self.map_event(destination, event);

        match &result {
            Ok(request) => {
                debug!(
                    destination = %destination,
                    operation = request.operation.as_str(),
                    "Mapped event"
                );
                self.metrics.record_success(destination, request.operation);
            }
            Err(e) => {
                warn!(
                    destination = %destination,
                    event_type = event.event_type(),
                    error_code = e.error_code(),
                    "Failed to map event"
                );
                self.metrics.record_failure(Some(destination));
            }
        }

        result
    }

    fn map_event(
        &self,
        destination: Destination,
        event: &AnalyticsEvent,
    ) -> MappingResult<DestinationRequest> {
        let mapper = self
            .mappers
            .get(&destination)
            .ok_or_else(|| MappingError::destination_disabled(destination.display_name()))?;

        let (operation, body) = match event {
            AnalyticsEvent::Identify(identify) => (Operation::Identify, mapper.map_identify(identify)?),
            AnalyticsEvent::Track(track) => (Operation::Track, mapper.map_track(track)?),
        };

        Ok(DestinationRequest {
            destination,
            operation,
            body,
        })
    }
}
