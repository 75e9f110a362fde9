//! # Seedling Core
//!
//! Core utilities, configuration management, logging, and common functionality
//! for the Seedling secret provisioner.
//!
//! This crate provides:
//!
//! - **Configuration**: Multi-layer configuration (defaults, file, flags, environment)
//! - **Logging**: `tracing` subscriber setup writing to stderr
//! - **Terminal**: Colored output, terminal detection
//! - **Process Execution**: Running external tools and capturing their output
//! - **File Operations**: Path expansion, writes that create parent directories
//! - **Time Utilities**: Human-readable durations
//!
//! ## Example
//!
//! ```no_run
//! use seedling_core::config::ProvisionConfig;
//!
//! let config = ProvisionConfig::load(None, seedling_core::config::process_env())?;
//! seedling_core::log::init(config.log_level)?;
//! let output = seedling_core::util::run("openssl", ["version"])?;
//! # Ok::<(), seedling_core::SeedlingError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod log;
pub mod term;
pub mod util;
pub mod time;

// Re-export commonly used items
pub use config::{Config, ProvisionConfig};
pub use seedling_types::{SeedlingError, Result};

/// Seedling application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seedling application name
pub const APP_NAME: &str = "seedling";
