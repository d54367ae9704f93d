//! Configuration module for the destination mapper
//!
//! Per-destination settings plus the observability knobs the embedding
//! pipeline uses when it initialises logging.

use crate::error::{MappingError, MappingResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Log formats understood by [`crate::telemetry::init_tracing`]
pub const LOG_FORMATS: [&str; 4] = ["json", "pretty", "text", "compact"];

/// Main configuration structure for the destination mapper
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Outbound (messaging platform) settings
    pub outbound: OutboundSettings,
    /// Help Scout (support platform) settings
    pub help_scout: HelpScoutSettings,
    /// Observability configuration
    pub observability: ObservabilityConfig,
}

/// Outbound schema revision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolVersion {
    /// Legacy flat schema keyed by `api_key`
    V1,
    /// Current schema with attributes and push token routing
    #[default]
    V2,
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::V1 => write!(f, "v1"),
            ProtocolVersion::V2 => write!(f, "v2"),
        }
    }
}

impl FromStr for ProtocolVersion {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(ProtocolVersion::V1),
            "v2" | "2" => Ok(ProtocolVersion::V2),
            other => Err(MappingError::configuration(format!(
                "Unknown protocol version: {}",
                other
            ))),
        }
    }
}

/// Outbound destination settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutboundSettings {
    /// Schema revision to target (default: v2)
    pub protocol_version: ProtocolVersion,
    /// API key, only sent under v1
    pub api_key: Option<String>,
    /// Legacy boolean switch; `true` forces v1 regardless of `protocol_version`
    pub v1: bool,
}

impl OutboundSettings {
    pub fn v1<S: Into<String>>(api_key: S) -> Self {
        Self {
            protocol_version: ProtocolVersion::V1,
            api_key: Some(api_key.into()),
            v1: false,
        }
    }

    pub fn v2() -> Self {
        Self::default()
    }

    /// Version actually used for mapping, honouring the legacy flag
    pub fn effective_version(&self) -> ProtocolVersion {
        if self.v1 {
            ProtocolVersion::V1
        } else {
            self.protocol_version
        }
    }
}

/// Help Scout destination settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpScoutSettings {
    /// Enable the Help Scout mapper
    pub enabled: bool,
}

impl Default for HelpScoutSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Observability configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or `EnvFilter` directive (default: info)
    pub log_level: String,
    /// Log format: json, pretty, text or compact (default: json)
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "json".to_string(),
        }
    }
}

impl MapperConfig {
    /// Load configuration from `MAPPER_*` environment variables, e.g.
    /// `MAPPER_OUTBOUND__PROTOCOL_VERSION=v1`, plus an optional file named
    /// by `MAPPER_CONFIG_FILE`.
    pub fn from_env() -> MappingResult<Self> {
        Self::load(
            std::env::var("MAPPER_CONFIG_FILE").ok(),
            environment_source(),
        )
    }

    fn load(
        config_path: Option<String>,
        environment: config::Environment,
    ) -> MappingResult<Self> {
        let mut cfg = config::Config::builder()
            .set_default("outbound.protocol_version", "v2")?
            .set_default("outbound.v1", false)?
            .set_default("help_scout.enabled", true)?
            .set_default("observability.log_level", "info")?
            .set_default("observability.log_format", "json")?;

        // File first so the environment overrides it
        if let Some(config_path) = config_path {
            cfg = cfg.add_source(config::File::with_name(&config_path).required(false));
        }

        Ok(cfg.add_source(environment).build()?.try_deserialize()?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> MappingResult<()> {
        if !LOG_FORMATS.contains(&self.observability.log_format.as_str()) {
            return Err(MappingError::configuration(format!(
                "Unknown log format: {}",
                self.observability.log_format
            )));
        }

        // A missing key under v1 surfaces at delivery time, not here
        if self.outbound.effective_version() == ProtocolVersion::V1
            && self.outbound.api_key.is_none()
        {
            warn!("Outbound protocol v1 selected without an api_key");
        }

        Ok(())
    }
}

fn environment_source() -> config::Environment {
    config::Environment::with_prefix("MAPPER")
        .prefix_separator("_")
        .separator("__")
}
