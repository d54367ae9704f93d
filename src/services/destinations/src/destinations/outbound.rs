//! Outbound messaging mapping
//!
//! Two schema revisions are supported. v1 is the legacy flat body keyed by
//! an account `api_key`; v2 promotes well-known traits to top-level fields
//! and routes mobile push tokens by platform.

use super::{Destination, DestinationMapper};
use crate::config::{OutboundSettings, ProtocolVersion};
use crate::error::MappingResult;
use crate::models::{
    CurrentIdentify, CurrentTrack, IdentifyMessagePayload, LegacyIdentify, LegacyTrack,
    TrackMessagePayload,
};
use destination_shared::{EventFacade, Identify, KeyAliases, Track};
use serde_json::Value;
use tracing::debug;

/// Outbound mapper bound to one set of destination settings
#[derive(Debug, Clone, Default)]
pub struct OutboundMapper {
    settings: OutboundSettings,
}

impl OutboundMapper {
    pub fn new(settings: OutboundSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &OutboundSettings {
        &self.settings
    }
}

impl DestinationMapper for OutboundMapper {
    fn destination(&self) -> Destination {
        Destination::Outbound
    }

    fn map_identify(&self, identify: &Identify) -> MappingResult<Value> {
        Ok(serde_json::to_value(map_identify(identify, &self.settings))?)
    }

    fn map_track(&self, track: &Track) -> MappingResult<Value> {
        Ok(serde_json::to_value(map_track(track, &self.settings))?)
    }

    fn supported_events(&self) -> Vec<String> {
        vec!["identify".to_string(), "track".to_string()]
    }
}

/// Traits promoted to top-level v2 fields, stripped from `attributes` under
/// any of these spellings
pub fn promoted_trait_aliases() -> KeyAliases {
    KeyAliases::new()
        .with("firstName", &["first_name", "firstname"])
        .with("lastName", &["last_name", "lastname"])
        .with("userId", &["user_id"])
        .with("phone", &[])
        .with("email", &[])
        .with("id", &[])
}

/// Map an identify event to an Outbound identify body
pub fn map_identify(identify: &Identify, settings: &OutboundSettings) -> IdentifyMessagePayload {
    match settings.effective_version() {
        ProtocolVersion::V1 => IdentifyMessagePayload::V1(LegacyIdentify {
            user_id: identify.user_id().or_else(|| identify.session_id()),
            traits: identify.traits(),
            api_key: settings.api_key.clone(),
        }),
        ProtocolVersion::V2 => IdentifyMessagePayload::V2(current_identify(identify)),
    }
}

/// Map a track event to an Outbound track body
pub fn map_track(track: &Track, settings: &OutboundSettings) -> TrackMessagePayload {
    match settings.effective_version() {
        ProtocolVersion::V1 => TrackMessagePayload::V1(LegacyTrack {
            user_id: track.user_id().or_else(|| track.session_id()),
            payload: track.properties(),
            api_key: settings.api_key.clone(),
            event: track.event_name(),
        }),
        ProtocolVersion::V2 => TrackMessagePayload::V2(CurrentTrack {
            user_id: track.user_id(),
            properties: track.properties(),
            event: track.event_name(),
        }),
    }
}

fn current_identify(identify: &Identify) -> CurrentIdentify {
    let mut attributes = identify.traits();
    let stripped = promoted_trait_aliases().remove_from(&mut attributes);
    if !stripped.is_empty() {
        debug!(?stripped, "Removed promoted traits from Outbound attributes");
    }

    let mut body = CurrentIdentify {
        user_id: identify.user_id(),
        attributes,
        email: identify.email(),
        phone: identify.phone(),
        first_name: identify.first_name(),
        last_name: identify.last_name(),
        gcm: None,
        apns: None,
    };

    route_device_token(identify, &mut body);
    body
}

/// Attach `context.device.token` to `gcm` and/or `apns` based on the
/// library name in `context.library.name`.
fn route_device_token(identify: &Identify, body: &mut CurrentIdentify) {
    let Some(token) = identify.proxy("context.device.token").present_value() else {
        return;
    };
    let Some(library) = identify.proxy("context.library.name").as_str() else {
        return;
    };

    if found_after_start(library, "android") {
        body.gcm = Some(vec![token.clone()]);
    }
    if found_after_start(library, "ios") {
        body.apns = Some(vec![token]);
    }
}

/// True when the first occurrence of `needle` starts after the first byte.
// TODO: confirm with the Outbound team whether a library name that starts
// with the platform (e.g. "ios-lib") should route; it currently does not.
pub(crate) fn found_after_start(haystack: &str, needle: &str) -> bool {
    haystack.find(needle).is_some_and(|index| index > 0)
}
