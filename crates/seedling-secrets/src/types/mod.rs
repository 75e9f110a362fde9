//! Secret value sources and external tool adapters.

pub mod random;
pub mod user_provided;
pub mod ssh;
pub mod x509;

pub use random::{RandomStreams, RandomStrings, ALPHABET};
pub use user_provided::Prompt;
pub use ssh::SshKeygen;
pub use x509::{CertificateInfo, OpensslSelfSigned};

use seedling_types::config::ToolsConfig;

/// Build the real tool adapters from configuration.
pub fn tools_from_config(tools: &ToolsConfig) -> (SshKeygen, OpensslSelfSigned) {
    (
        SshKeygen::new().with_binary(&tools.ssh_keygen),
        OpensslSelfSigned::new().with_binary(&tools.openssl),
    )
}
