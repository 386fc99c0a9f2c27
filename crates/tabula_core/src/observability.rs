//! Tracing subscriber initialization.

use tabula_error::{ConfigError, ConfigOrigin};
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Set `json` for one JSON object per event.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(json: bool) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| {
        ConfigError::new(
            ConfigOrigin::Tracing,
            format!("Failed to install tracing subscriber: {}", e),
        )
    })?;
    tracing::debug!(json, "Tracing subscriber installed");
    Ok(())
}
