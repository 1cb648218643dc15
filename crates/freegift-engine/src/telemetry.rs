//! Tracing initialization.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;
use crate::error::{EngineError, EngineResult};

/// Initializes the global tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - overrides the configured filter
/// - `RUST_LOG=freegift_engine=trace` - trace for the engine only
/// - Default: `settings.filter`
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_tracing(settings: &LoggingSettings) -> EngineResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.filter).map_err(|e| {
            EngineError::InvalidConfig(format!("bad logging.filter '{}': {}", settings.filter, e))
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = if settings.json {
        builder.json().with_target(false).try_init()
    } else {
        builder.try_init()
    };

    Ok(())
}
