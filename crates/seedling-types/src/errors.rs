//! Error types for Seedling operations.

use thiserror::Error;

/// The main error type for Seedling operations.
///
/// Nothing in the provisioner recovers from these: every variant aborts the
/// run and surfaces as a non-zero exit code from the binary.
#[derive(Error, Debug)]
pub enum SeedlingError {
    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Secret provisioning error
    #[error("Secret error: {0}")]
    Secret(String),

    /// Validation error (malformed identifiers, bad settings)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A generator produced no value for a secret that needed one
    #[error("No value available for secret '{0}': generator is exhausted")]
    Exhausted(String),

    /// Operator input could not be read
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// External tool exited unsuccessfully
    #[error("{tool} exited with status {code}: {stderr}")]
    Process {
        /// Tool name as invoked
        tool: String,
        /// Exit code (-1 when terminated by a signal)
        code: i32,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for Seedling operations.
pub type Result<T> = std::result::Result<T, SeedlingError>;

/// Helper macro to bail out with a SeedlingError
///
/// This is used for expected error conditions.
///
/// # Example
///
/// ```ignore
/// if !valid {
///     bail!(Validation, "Invalid secret id: {}", reason);
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::SeedlingError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::SeedlingError::$variant(format!($fmt, $($arg)*)))
    };
    ($msg:expr) => {
        return Err($crate::SeedlingError::Other($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::SeedlingError::Other(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reject(reason: &str) -> Result<()> {
        bail!(Validation, "rejected: {}", reason);
    }

    #[test]
    fn test_bail_builds_variant() {
        match reject("too short") {
            Err(SeedlingError::Validation(msg)) => assert_eq!(msg, "rejected: too short"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_process_error_message() {
        let err = SeedlingError::Process {
            tool: "ssh-keygen".to_string(),
            code: 1,
            stderr: "Saving key failed".to_string(),
        };
        assert_eq!(err.to_string(), "ssh-keygen exited with status 1: Saving key failed");
    }
}
