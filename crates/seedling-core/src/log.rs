//! Logging system for Seedling.
//!
//! Log records go to stderr so they never interleave with prompts or the
//! summary on stdout. `RUST_LOG` takes precedence over the configured level.

use seedling_types::{LogLevel, SeedlingError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Build the filter directive for `level`, scoped to Seedling's own crates.
pub fn directive(level: LogLevel) -> String {
    format!("{}={}", crate::APP_NAME, level.as_directive())
}

/// Initialize the logging system at `level`.
pub fn init(level: LogLevel) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive(level)));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .try_init()
        .map_err(|e| SeedlingError::Other(format!("Failed to initialize logging: {}", e)))
}
