//! Self-signed X.509 certificates through `openssl`, and inspection of the
//! certificates already on disk.

use chrono::{DateTime, TimeZone, Utc};
use seedling_core::util::process;
use seedling_types::{CertificateGenerator, SeedlingError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use x509_parser::pem::parse_x509_pem;

/// File name of the private key inside a certificate secret.
pub const KEY_FILE: &str = "key.pem";

/// File name of the certificate inside a certificate secret.
pub const CERT_FILE: &str = "cert.pem";

/// Build the certificate subject for `domain`.
///
/// Only the common name varies; `/` and `\` in the domain are escaped so the
/// name cannot inject extra attributes.
pub fn subject(domain: &str) -> String {
    let escaped = domain.replace('\\', "\\\\").replace('/', "\\/");
    format!(
        "/C=XX/ST=Self-Signed/L=Self-Signed/O=Seedling Self-Signed/OU=Bootstrap/CN={}",
        escaped
    )
}

/// `openssl req` executor producing passphrase-less self-signed certificates.
#[derive(Debug, Clone)]
pub struct OpensslSelfSigned {
    binary_path: PathBuf,
    bits: u32,
    validity_days: u32,
}

impl OpensslSelfSigned {
    /// RSA key size used unless overridden.
    pub const DEFAULT_BITS: u32 = 4096;

    /// Validity used unless overridden.
    pub const DEFAULT_VALIDITY_DAYS: u32 = 365;

    /// Create an executor using `openssl` from `PATH`.
    pub fn new() -> Self {
        Self {
            binary_path: PathBuf::from("openssl"),
            bits: Self::DEFAULT_BITS,
            validity_days: Self::DEFAULT_VALIDITY_DAYS,
        }
    }

    /// Set custom openssl binary path.
    pub fn with_binary(mut self, path: impl AsRef<Path>) -> Self {
        self.binary_path = path.as_ref().to_path_buf();
        self
    }

    /// Set the RSA key size.
    pub fn with_bits(mut self, bits: u32) -> Self {
        self.bits = bits;
        self
    }

    /// Set how many days the certificate is valid for.
    pub fn with_validity_days(mut self, days: u32) -> Self {
        self.validity_days = days;
        self
    }

    /// Arguments passed to the tool.
    pub fn args(&self, domain: &str, key_pem: &Path, cert_pem: &Path) -> Vec<OsString> {
        vec![
            "req".into(),
            "-x509".into(),
            "-newkey".into(),
            format!("rsa:{}", self.bits).into(),
            "-nodes".into(),
            "-days".into(),
            self.validity_days.to_string().into(),
            "-keyout".into(),
            key_pem.as_os_str().to_os_string(),
            "-out".into(),
            cert_pem.as_os_str().to_os_string(),
            "-subj".into(),
            subject(domain).into(),
        ]
    }
}

impl Default for OpensslSelfSigned {
    fn default() -> Self {
        Self::new()
    }
}

impl CertificateGenerator for OpensslSelfSigned {
    fn generate_self_signed(&self, domain: &str, key_pem: &Path, cert_pem: &Path) -> Result<()> {
        tracing::debug!(
            "Generating self-signed certificate for {} valid {} days",
            domain,
            self.validity_days
        );
        process::run_checked(&self.binary_path, self.args(domain, key_pem, cert_pem))?;
        Ok(())
    }

    fn name(&self) -> &str {
        "openssl"
    }
}

/// The parts of a certificate that `check` reports on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateInfo {
    /// Full subject, RFC 4514 style
    pub subject: String,
    /// First common name, if any
    pub common_name: Option<String>,
    /// Start of validity
    pub not_before: DateTime<Utc>,
    /// End of validity
    pub not_after: DateTime<Utc>,
}

impl CertificateInfo {
    /// Parse the first PEM certificate in `data`.
    pub fn from_pem(data: &[u8]) -> Result<Self> {
        let (_, pem) = parse_x509_pem(data)
            .map_err(|e| SeedlingError::Secret(format!("Invalid PEM data: {}", e)))?;

        let cert = pem
            .parse_x509()
            .map_err(|e| SeedlingError::Secret(format!("Invalid X.509 certificate: {}", e)))?;

        let common_name = cert
            .subject()
            .iter_common_name()
            .next()
            .and_then(|cn| cn.as_str().ok())
            .map(String::from);

        let validity = cert.validity();

        Ok(Self {
            subject: cert.subject().to_string(),
            common_name,
            not_before: to_utc(validity.not_before.timestamp())?,
            not_after: to_utc(validity.not_after.timestamp())?,
        })
    }

    /// Whether the certificate has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.not_after
    }
}

fn to_utc(timestamp: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .ok_or_else(|| SeedlingError::Secret(format!("Certificate timestamp out of range: {}", timestamp)))
}
