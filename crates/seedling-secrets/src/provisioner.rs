//! Idempotent generate-if-absent provisioning.

use crate::store::SecretsDir;
use crate::types::{ssh, x509};
use seedling_types::{
    CertificateGenerator, KeypairGenerator, Outcome, Result, SecretId, SeedlingError,
};
use std::fmt::Display;
use tracing::{debug, info};

fn skip_notice(what: impl Display) -> String {
    format!("Skipping {} because secret already exists", what)
}

/// Materializes secrets that are missing and leaves existing ones alone.
///
/// Every operation checks for existence first and only then pulls a value
/// or runs a tool. Nothing is ever overwritten.
pub struct Provisioner<'a> {
    store: SecretsDir,
    keygen: &'a dyn KeypairGenerator,
    certgen: &'a dyn CertificateGenerator,
}

impl<'a> Provisioner<'a> {
    /// Create a provisioner writing into `store`.
    pub fn new(
        store: SecretsDir,
        keygen: &'a dyn KeypairGenerator,
        certgen: &'a dyn CertificateGenerator,
    ) -> Self {
        Self { store, keygen, certgen }
    }

    /// The secrets directory being provisioned.
    pub fn store(&self) -> &SecretsDir {
        &self.store
    }

    /// Write one value from `values` to `id` unless something already exists
    /// there.
    ///
    /// The generator is not touched when the secret exists. Otherwise exactly
    /// one value is pulled.
    pub fn ensure_secret<I>(&self, id: &SecretId, values: &mut I) -> Result<Outcome>
    where
        I: Iterator<Item = Result<String>> + ?Sized,
    {
        if self.store.exists(id) {
            info!("{}", skip_notice(id));
            return Ok(Outcome::Skipped);
        }

        let value = values
            .next()
            .ok_or_else(|| SeedlingError::Exhausted(id.to_string()))??;

        let path = self.store.write(id, &value)?;
        info!("Generated secret {}", id);
        debug!("Wrote {} bytes to {:?}", value.len(), path);

        Ok(Outcome::Created)
    }

    /// Create an SSH keypair at `<id>/key` and `<id>/key.pub` unless the
    /// private key already exists.
    pub fn ensure_ssh_keypair(&self, id: &SecretId) -> Result<Outcome> {
        let private_key = self.store.file_in(id, ssh::PRIVATE_KEY_FILE);

        if private_key.exists() {
            info!("{}", skip_notice(private_key.display()));
            return Ok(Outcome::Skipped);
        }

        self.store.create_dir(id)?;
        debug!("Running {} for {}", self.keygen.name(), id);
        self.keygen.generate_keypair(&private_key)?;
        info!("Generated SSH keypair {}", id);

        Ok(Outcome::Created)
    }

    /// Create a self-signed certificate at `<id>/key.pem` and `<id>/cert.pem`
    /// unless the `<id>` directory already exists.
    ///
    /// The domain name is pulled from `domains` only when the certificate is
    /// actually going to be generated.
    pub fn ensure_self_signed_cert<I>(&self, id: &SecretId, domains: &mut I) -> Result<Outcome>
    where
        I: Iterator<Item = Result<String>> + ?Sized,
    {
        if self.store.exists(id) {
            info!("{}", skip_notice(id));
            return Ok(Outcome::Skipped);
        }

        let domain = domains
            .next()
            .ok_or_else(|| SeedlingError::Exhausted(id.to_string()))??;
        let domain = domain.trim();

        self.store.create_dir(id)?;
        let key_pem = self.store.file_in(id, x509::KEY_FILE);
        let cert_pem = self.store.file_in(id, x509::CERT_FILE);

        debug!("Running {} for {} ({})", self.certgen.name(), id, domain);
        self.certgen.generate_self_signed(domain, &key_pem, &cert_pem)?;
        info!("Generated self-signed certificate {} for {}", id, domain);

        Ok(Outcome::Created)
    }
}
