//! # Seedling Secrets
//!
//! Generate-if-absent provisioning for the secrets of an installation.
//!
//! Provides:
//! - Random passwords from named, shareable streams
//! - Values typed in by the operator
//! - SSH keypairs through `ssh-keygen`
//! - Self-signed certificates through `openssl`
//! - Read-only validation of an existing secrets directory

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod console;
pub mod plan;
pub mod provisioner;
pub mod store;
pub mod types;
pub mod validator;

pub use console::{LineConsole, TerminalConsole};
pub use plan::{PlanEntry, ProvisionReport, SecretPlan, SecretSource};
pub use provisioner::Provisioner;
pub use store::SecretsDir;
pub use types::*;
pub use validator::{SecretValidator, ValidatedSecret, ValidationSummary};
