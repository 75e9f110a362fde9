//! The secrets directory.

use seedling_core::util::fs as fsutil;
use seedling_types::{Result, SecretId};
use std::path::{Path, PathBuf};

/// A directory tree holding one file or directory per secret.
///
/// Existence is the only state the provisioner asks about; contents are
/// written once and never touched again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretsDir {
    root: PathBuf,
}

impl SecretsDir {
    /// Secrets directory rooted at `root`. Nothing is created yet.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of `id` under the root.
    pub fn path_of(&self, id: &SecretId) -> PathBuf {
        id.path_in(&self.root)
    }

    /// Location of `file` inside the directory secret `id`.
    pub fn file_in(&self, id: &SecretId, file: &str) -> PathBuf {
        self.path_of(id).join(file)
    }

    /// Whether anything, file or directory, exists at `id`.
    pub fn exists(&self, id: &SecretId) -> bool {
        self.path_of(id).exists()
    }

    /// Write `value` verbatim to `id`, creating parent directories.
    pub fn write(&self, id: &SecretId, value: &str) -> Result<PathBuf> {
        let path = self.path_of(id);
        fsutil::write_with_parents(&path, value)?;
        Ok(path)
    }

    /// Create the directory for `id` and any missing parents.
    pub fn create_dir(&self, id: &SecretId) -> Result<PathBuf> {
        let path = self.path_of(id);
        fsutil::mkdir_p(&path)?;
        Ok(path)
    }
}
