//! Core trait definitions for Seedling abstractions.
//!
//! These are the seams between the provisioning logic and the outside
//! world: the operator at the terminal and the external key tools.

use std::path::Path;
use crate::errors::Result;

/// Source of operator input.
pub trait Console {
    /// Display `prompt` and read one line of input.
    ///
    /// Returns `Ok(None)` when the input stream is closed. The trailing
    /// newline is stripped; an empty line is returned as `Some("")`.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Show an informational line to the operator.
    fn notice(&mut self, text: &str) -> Result<()>;
}

/// Generates an SSH keypair on disk.
pub trait KeypairGenerator {
    /// Write a private key to `private_key` and its public half next to it
    /// with a `.pub` suffix. The parent directory already exists.
    fn generate_keypair(&self, private_key: &Path) -> Result<()>;

    /// Short name for logs and errors.
    fn name(&self) -> &str;
}

/// Generates a self-signed certificate and its private key on disk.
pub trait CertificateGenerator {
    /// Write `key_pem` and `cert_pem` for a certificate whose common name is
    /// `domain`. The parent directory already exists.
    fn generate_self_signed(&self, domain: &str, key_pem: &Path, cert_pem: &Path) -> Result<()>;

    /// Short name for logs and errors.
    fn name(&self) -> &str;
}

/// Validation result for an existing secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Secret is present and well-formed
    Ok,
    /// Secret is missing
    Missing,
    /// Secret is present but looks questionable (e.g., expiring soon)
    Warning(Vec<String>),
    /// Secret is present but unusable (e.g., half-written)
    Error(Vec<String>),
}
