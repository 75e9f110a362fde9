//! Configuration types and structures.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// External tool locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Binary used to create SSH keypairs
    #[serde(default = "default_ssh_keygen")]
    pub ssh_keygen: PathBuf,
    /// Binary used to create self-signed certificates
    #[serde(default = "default_openssl")]
    pub openssl: PathBuf,
}

fn default_ssh_keygen() -> PathBuf {
    PathBuf::from("ssh-keygen")
}

fn default_openssl() -> PathBuf {
    PathBuf::from("openssl")
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ssh_keygen: default_ssh_keygen(),
            openssl: default_openssl(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tools_defaults_fill_missing_fields() {
        let tools: ToolsConfig = serde_yaml::from_str("openssl: /usr/local/bin/openssl").unwrap();
        assert_eq!(tools.ssh_keygen, PathBuf::from("ssh-keygen"));
        assert_eq!(tools.openssl, PathBuf::from("/usr/local/bin/openssl"));
    }
}
