//! Destination mapper implementations
//!
//! Each destination turns an analytics event into the JSON body its API
//! expects. Mappers are pure: they read the event and their settings and
//! return a freshly built payload.

pub mod help_scout;
pub mod outbound;

use crate::config::MapperConfig;
use crate::error::{MappingError, MappingResult};
use destination_shared::{normalize_key, Identify, Track};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Supported destinations
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Customer support platform
    HelpScout,
    /// Messaging platform
    Outbound,
}

impl Destination {
    pub const ALL: [Destination; 2] = [Destination::HelpScout, Destination::Outbound];

    /// Look a destination up by name, ignoring case, spaces and punctuation
    pub fn from_name(name: &str) -> MappingResult<Self> {
        match normalize_key(name).as_str() {
            "helpscout" => Ok(Destination::HelpScout),
            "outbound" => Ok(Destination::Outbound),
            _ => Err(MappingError::unknown_destination(name)),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Destination::HelpScout => "Help Scout",
            Destination::Outbound => "Outbound",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Common interface for all destination mappers
pub trait DestinationMapper: Send + Sync {
    fn destination(&self) -> Destination;

    /// Map an identify event to the destination's JSON body
    fn map_identify(&self, identify: &Identify) -> MappingResult<Value>;

    /// Map a track event to the destination's JSON body
    fn map_track(&self, _track: &Track) -> MappingResult<Value> {
        Err(MappingError::unsupported_event(
            self.destination().display_name(),
            "track",
        ))
    }

    /// Event types this destination accepts
    fn supported_events(&self) -> Vec<String>;
}

/// Factory for creating destination mapper instances
pub struct DestinationFactory;

impl DestinationFactory {
    pub fn create_help_scout() -> Box<dyn DestinationMapper> {
        Box::new(help_scout::HelpScoutMapper::new())
    }

    pub fn create_outbound(config: &crate::config::OutboundSettings) -> Box<dyn DestinationMapper> {
        Box::new(outbound::OutboundMapper::new(config.clone()))
    }

    /// Build the mapper for `destination`, or `None` when it is disabled
    pub fn create(
        destination: Destination,
        config: &MapperConfig,
    ) -> Option<Box<dyn DestinationMapper>> {
        match destination {
            Destination::HelpScout if config.help_scout.enabled => Some(Self::create_help_scout()),
            Destination::HelpScout => None,
            Destination::Outbound => Some(Self::create_outbound(&config.outbound)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutboundSettings;

    #[test]
    fn test_destination_from_name() {
        for name in ["Help Scout", "helpscout", "help-scout", "HELP_SCOUT"] {
            assert_eq!(Destination::from_name(name).unwrap(), Destination::HelpScout);
        }
        assert_eq!(Destination::from_name("Outbound").unwrap(), Destination::Outbound);

        let err = Destination::from_name("Intercom").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_DESTINATION");
    }

    #[test]
    fn test_factory_creates_mappers() {
        let mapper = DestinationFactory::create_help_scout();
        assert_eq!(mapper.destination(), Destination::HelpScout);
        assert_eq!(mapper.supported_events(), vec!["identify".to_string()]);

        let mapper = DestinationFactory::create_outbound(&OutboundSettings::v2());
        assert_eq!(mapper.destination(), Destination::Outbound);
        assert!(mapper.supported_events().contains(&"track".to_string()));
    }

    #[test]
    fn test_factory_skips_disabled_destination() {
        let mut config = MapperConfig::default();
        assert!(DestinationFactory::create(Destination::HelpScout, &config).is_some());

        config.help_scout.enabled = false;
        assert!(DestinationFactory::create(Destination::HelpScout, &config).is_none());
        assert!(DestinationFactory::create(Destination::Outbound, &config).is_some());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Destination::HelpScout.to_string(), "Help Scout");
        assert_eq!(Destination::Outbound.to_string(), "Outbound");
    }
}
