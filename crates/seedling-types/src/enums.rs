//! Common enumerations used throughout Seedling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{SeedlingError, Result};

/// Log level enumeration for the logging system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging
    None,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Detailed trace messages
    Trace,
}

impl LogLevel {
    /// The matching `tracing` filter directive.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::None => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// One step more verbose, saturating at `Trace`.
    pub fn louder(self) -> Self {
        match self {
            LogLevel::None => LogLevel::Error,
            LogLevel::Error => LogLevel::Warn,
            LogLevel::Warn => LogLevel::Info,
            LogLevel::Info => LogLevel::Debug,
            LogLevel::Debug | LogLevel::Trace => LogLevel::Trace,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl FromStr for LogLevel {
    type Err = SeedlingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "NONE" | "OFF" => Ok(LogLevel::None),
            "ERROR" => Ok(LogLevel::Error),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            "TRACE" => Ok(LogLevel::Trace),
            _ => Err(SeedlingError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::None => write!(f, "NONE"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Trace => write!(f, "TRACE"),
        }
    }
}

/// Kinds of secrets the provisioner knows how to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecretKind {
    /// Random string drawn from a shared stream
    Random,
    /// Value typed in by the operator
    Prompted,
    /// SSH keypair produced by an external tool
    SshKeypair,
    /// Self-signed X.509 certificate and key
    SelfSignedCert,
}

impl fmt::Display for SecretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretKind::Random => write!(f, "random"),
            SecretKind::Prompted => write!(f, "prompted"),
            SecretKind::SshKeypair => write!(f, "ssh-keypair"),
            SecretKind::SelfSignedCert => write!(f, "self-signed-cert"),
        }
    }
}

/// Result of a single idempotent provisioning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The secret was absent and has been written
    Created,
    /// The secret already existed and was left untouched
    Skipped,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created => write!(f, "created"),
            Outcome::Skipped => write!(f, "skipped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("off".parse::<LogLevel>().unwrap(), LogLevel::None);
        assert!("chatty".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_level_louder() {
        assert_eq!(LogLevel::Info.louder(), LogLevel::Debug);
        assert_eq!(LogLevel::Trace.louder(), LogLevel::Trace);
    }

    #[test]
    fn test_secret_kind_serde() {
        let kind: SecretKind = serde_json::from_str("\"ssh-keypair\"").unwrap();
        assert_eq!(kind, SecretKind::SshKeypair);
        assert_eq!(SecretKind::SelfSignedCert.to_string(), "self-signed-cert");
    }
}
