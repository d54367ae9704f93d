//! Tracing initialisation for processes embedding the mapper

use crate::config::ObservabilityConfig;
use crate::error::{MappingError, MappingResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global subscriber built from `config`.
///
/// Fails if a global subscriber is already installed, so embedding
/// processes may call this unconditionally and ignore the error.
pub fn init_tracing(config: &ObservabilityConfig) -> MappingResult<()> {
    let filter = build_filter(config)?;

    let result = match config.log_format.as_str() {
        // JSON formatted logs for production
        "json" => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        "pretty" | "text" => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(false),
            )
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init(),
    };

    result.map_err(|e| MappingError::configuration(format!("Failed to initialize tracing: {}", e)))
}

/// `EnvFilter` from the configured level, falling back to `info`
pub fn build_filter(config: &ObservabilityConfig) -> MappingResult<EnvFilter> {
    EnvFilter::try_new(&config.log_level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| MappingError::configuration(format!("Invalid log filter: {}", e)))
}
