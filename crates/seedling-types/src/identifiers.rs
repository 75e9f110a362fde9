//! Type-safe identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use crate::errors::{SeedlingError, Result};

/// A validated secret identifier.
///
/// Secret identifiers are slash-delimited, path-like strings that name a
/// location under the secrets root. They must:
/// - Be non-empty
/// - Not start or end with a slash, nor contain empty segments
/// - Not contain `.` or `..` segments
/// - Not contain backslashes or NUL bytes
///
/// # Example
///
/// ```
/// use seedling_types::SecretId;
///
/// let id = SecretId::new("postgresql/nextcloud").unwrap();
/// assert_eq!(id.as_str(), "postgresql/nextcloud");
///
/// // Identifiers cannot escape the secrets root
/// assert!(SecretId::new("../etc/passwd").is_err());
/// assert!(SecretId::new("/absolute").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretId(String);

impl SecretId {
    /// Create a new validated secret identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier doesn't meet validation requirements.
    pub fn new(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref();
        if !Self::is_valid(id) {
            return Err(SeedlingError::Validation(format!(
                "Invalid secret id '{}': must be slash-separated non-empty segments, \
                without '.', '..', backslashes, or leading/trailing slashes",
                id
            )));
        }
        Ok(Self(id.to_string()))
    }

    /// Check if an identifier is valid without allocating.
    pub fn is_valid(id: &str) -> bool {
        if id.is_empty() || id.contains('\\') || id.contains('\0') {
            return false;
        }

        id.split('/').all(|segment| !segment.is_empty() && segment != "." && segment != "..")
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the slash-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Resolve this identifier to a filesystem path under `root`.
    ///
    /// Segments are joined individually so the result uses the platform
    /// separator.
    pub fn path_in(&self, root: impl AsRef<Path>) -> PathBuf {
        let mut path = root.as_ref().to_path_buf();
        for segment in self.segments() {
            path.push(segment);
        }
        path
    }
}

impl fmt::Display for SecretId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SecretId {
    type Err = SeedlingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for SecretId {
    type Error = SeedlingError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SecretId> for String {
    fn from(id: SecretId) -> Self {
        id.0
    }
}

impl AsRef<str> for SecretId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
