//! Progress indicators and spinners.

use indicatif::{ProgressBar, ProgressStyle};
use seedling_types::{CertificateGenerator, KeypairGenerator, Result};
use std::path::Path;

/// Create a spinner for long-running operations.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Shows a spinner while the wrapped tool runs.
///
/// 4096-bit key generation can take several seconds.
pub struct Spinning<G> {
    inner: G,
}

impl<G> Spinning<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }
}

impl<G: KeypairGenerator> KeypairGenerator for Spinning<G> {
    fn generate_keypair(&self, private_key: &Path) -> Result<()> {
        let pb = spinner(&format!("Generating SSH keypair with {}", self.inner.name()));
        let result = self.inner.generate_keypair(private_key);
        pb.finish_and_clear();
        result
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

impl<G: CertificateGenerator> CertificateGenerator for Spinning<G> {
    fn generate_self_signed(&self, domain: &str, key_pem: &Path, cert_pem: &Path) -> Result<()> {
        let pb = spinner(&format!("Generating certificate for {} with {}", domain, self.inner.name()));
        let result = self.inner.generate_self_signed(domain, key_pem, cert_pem);
        pb.finish_and_clear();
        result
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
