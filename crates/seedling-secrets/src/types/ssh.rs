//! SSH keypair generation through `ssh-keygen`.

use seedling_core::util::process;
use seedling_types::{KeypairGenerator, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File name of the private key inside an SSH keypair secret.
pub const PRIVATE_KEY_FILE: &str = "key";

/// File name of the public key inside an SSH keypair secret.
pub const PUBLIC_KEY_FILE: &str = "key.pub";

/// `ssh-keygen` executor producing passphrase-less RSA keypairs.
#[derive(Debug, Clone)]
pub struct SshKeygen {
    binary_path: PathBuf,
    bits: u32,
}

impl SshKeygen {
    /// Key size used unless overridden.
    pub const DEFAULT_BITS: u32 = 4096;

    /// Create an executor using `ssh-keygen` from `PATH`.
    pub fn new() -> Self {
        Self {
            binary_path: PathBuf::from("ssh-keygen"),
            bits: Self::DEFAULT_BITS,
        }
    }

    /// Set custom ssh-keygen binary path.
    pub fn with_binary(mut self, path: impl AsRef<Path>) -> Self {
        self.binary_path = path.as_ref().to_path_buf();
        self
    }

    /// Set the RSA key size.
    pub fn with_bits(mut self, bits: u32) -> Self {
        self.bits = bits;
        self
    }

    /// Arguments passed to the tool for a key written to `private_key`.
    pub fn args(&self, private_key: &Path) -> Vec<OsString> {
        vec![
            "-q".into(),
            "-t".into(),
            "rsa".into(),
            "-b".into(),
            self.bits.to_string().into(),
            "-N".into(),
            "".into(),
            "-f".into(),
            private_key.as_os_str().to_os_string(),
        ]
    }
}

impl Default for SshKeygen {
    fn default() -> Self {
        Self::new()
    }
}

impl KeypairGenerator for SshKeygen {
    fn generate_keypair(&self, private_key: &Path) -> Result<()> {
        tracing::debug!("Generating {}-bit SSH keypair at {:?}", self.bits, private_key);
        process::run_checked(&self.binary_path, self.args(private_key))?;
        Ok(())
    }

    fn name(&self) -> &str {
        "ssh-keygen"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args() {
        let keygen = SshKeygen::new();
        let args = keygen.args(Path::new("secrets/backup/key"));
        let args: Vec<&str> = args.iter().map(|a| a.to_str().unwrap()).collect();

        assert_eq!(
            args,
            vec!["-q", "-t", "rsa", "-b", "4096", "-N", "", "-f", "secrets/backup/key"]
        );
    }

    #[test]
    fn test_custom_bits() {
        let args = SshKeygen::new().with_bits(2048).args(Path::new("k"));
        assert_eq!(args[4], "2048");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_binary_is_reported() {
        let keygen = SshKeygen::new().with_binary("false");
        let err = keygen.generate_keypair(Path::new("unused")).unwrap_err();
        assert!(matches!(err, seedling_types::SeedlingError::Process { code: 1, .. }));
    }
}
