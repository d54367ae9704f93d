//! Analytics event model
//!
//! Read-only views over raw identify and track payloads. Accessors resolve
//! the common aliases a source may use (for example `traits.name` when no
//! `traits.firstName` is given) so destination mappers only ask for the
//! canonical field.

use crate::error::{SharedError, SharedResult};
use crate::path::{kind_of, PathResolver, Resolved};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// Accessors shared by every event type
pub trait EventFacade {
    /// Raw event payload
    fn raw(&self) -> &Value;

    /// Resolve a dot path rooted at the raw event, e.g. `context.device.token`
    fn proxy(&self, path: &str) -> Resolved<'_> {
        PathResolver::resolve(self.raw(), path)
    }

    fn user_id(&self) -> Option<String> {
        self.proxy("userId").to_text()
    }

    /// Anonymous session identifier, falling back to `anonymousId`
    fn session_id(&self) -> Option<String> {
        self.proxy("sessionId")
            .or_else(|| self.proxy("anonymousId"))
            .to_text()
    }

    fn context(&self) -> Map<String, Value> {
        object_or_empty(self.proxy("context"))
    }
}

/// An event describing a user and their known traits
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Identify {
    raw: Value,
}

impl Identify {
    pub fn new(raw: Value) -> SharedResult<Self> {
        ensure_object(&raw)?;
        Ok(Self { raw })
    }

    /// Copy of the trait bag. Carries `id = userId` when the source traits
    /// did not name an id of their own under any spelling.
    pub fn traits(&self) -> Map<String, Value> {
        let mut traits = object_or_empty(self.proxy("traits"));
        if self.proxy("traits.id").is_absent() {
            if let Some(user_id) = self.user_id() {
                traits.insert("id".to_string(), Value::String(user_id));
            }
        }
        traits
    }

    /// `traits.email`, or the user id when it is itself an email address
    pub fn email(&self) -> Option<String> {
        self.proxy("traits.email")
            .to_text()
            .or_else(|| self.user_id().filter(|id| looks_like_email(id)))
    }

    pub fn phone(&self) -> Option<String> {
        self.proxy("traits.phone").to_text()
    }

    pub fn name(&self) -> Option<String> {
        self.proxy("traits.name").to_text()
    }

    /// `traits.firstName`, else the first word of `traits.name`
    pub fn first_name(&self) -> Option<String> {
        self.proxy("traits.firstName").to_text().or_else(|| {
            self.name()
                .and_then(|name| name.split_whitespace().next().map(str::to_string))
        })
    }

    /// `traits.lastName`, else everything after the first word of `traits.name`
    pub fn last_name(&self) -> Option<String> {
        self.proxy("traits.lastName").to_text().or_else(|| {
            self.name().and_then(|name| {
                name.trim()
                    .split_once(char::is_whitespace)
                    .map(|(_, rest)| rest.trim().to_string())
                    .filter(|rest| !rest.is_empty())
            })
        })
    }
}

impl EventFacade for Identify {
    fn raw(&self) -> &Value {
        &self.raw
    }
}

/// An event describing a discrete user action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Track {
    raw: Value,
}

impl Track {
    pub fn new(raw: Value) -> SharedResult<Self> {
        ensure_object(&raw)?;
        Ok(Self { raw })
    }

    pub fn event_name(&self) -> Option<String> {
        self.proxy("event").to_text()
    }

    pub fn properties(&self) -> Map<String, Value> {
        object_or_empty(self.proxy("properties"))
    }
}

impl EventFacade for Track {
    fn raw(&self) -> &Value {
        &self.raw
    }
}

/// Inbound event, polymorphic over the supported event types
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalyticsEvent {
    Identify(Identify),
    Track(Track),
}

impl AnalyticsEvent {
    /// Classify a raw payload by its `type` field
    pub fn from_value(raw: Value) -> SharedResult<Self> {
        ensure_object(&raw)?;

        let event_type = PathResolver::resolve(&raw, "type")
            .as_str()
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match event_type.as_str() {
            "identify" => Ok(AnalyticsEvent::Identify(Identify { raw })),
            "track" => Ok(AnalyticsEvent::Track(Track { raw })),
            "" => Err(SharedError::unsupported_event_type("<missing>")),
            other => Err(SharedError::unsupported_event_type(other)),
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            AnalyticsEvent::Identify(_) => "identify",
            AnalyticsEvent::Track(_) => "track",
        }
    }

    pub fn facade(&self) -> &dyn EventFacade {
        match self {
            AnalyticsEvent::Identify(identify) => identify,
            AnalyticsEvent::Track(track) => track,
        }
    }
}

impl TryFrom<Value> for AnalyticsEvent {
    type Error = SharedError;

    fn try_from(raw: Value) -> SharedResult<Self> {
        Self::from_value(raw)
    }
}

fn ensure_object(raw: &Value) -> SharedResult<()> {
    if raw.is_object() {
        Ok(())
    } else {
        Err(SharedError::non_traversable(kind_of(raw)))
    }
}

fn object_or_empty(resolved: Resolved<'_>) -> Map<String, Value> {
    resolved.as_mapping().cloned().unwrap_or_default()
}

fn looks_like_email(candidate: &str) -> bool {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(EMAIL_PATTERN).ok())
        .as_ref()
        .is_some_and(|regex| regex.is_match(candidate))
}
