//! # Seedling Types
//!
//! Core types, traits, and enums shared across all Seedling crates.
//!
//! This crate provides the fundamental building blocks for the Seedling
//! secret provisioner, including:
//!
//! - A validated identifier for secrets living under the secrets root
//! - Common enums for log levels, secret kinds, and provisioning outcomes
//! - Seam traits for operator input and external key/certificate tools
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```
//! use seedling_types::{SecretId, SecretKind};
//!
//! let id = SecretId::new("postgresql/nextcloud").unwrap();
//! assert_eq!(id.segments().collect::<Vec<_>>(), vec!["postgresql", "nextcloud"]);
//! assert_eq!(SecretKind::Random.to_string(), "random");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod identifiers;
pub mod enums;
pub mod traits;
pub mod config;

// Re-export common types for convenience
pub use errors::{SeedlingError, Result};
pub use identifiers::SecretId;
pub use enums::{LogLevel, Outcome, SecretKind};
pub use traits::{CertificateGenerator, Console, KeypairGenerator, ValidationResult};
