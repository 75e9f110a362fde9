//! Filesystem utilities.

use seedling_types::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Expand a leading tilde to the home directory.
pub fn expand_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }

    path.to_path_buf()
}

/// Read entire file as string (slurp).
pub fn slurp(path: impl AsRef<Path>) -> Result<String> {
    fs::read_to_string(path).map_err(Into::into)
}

/// Ensure `dir` exists, creating it and any missing parents.
pub fn mkdir_p(dir: impl AsRef<Path>) -> Result<()> {
    fs::create_dir_all(dir).map_err(Into::into)
}

/// Write `contents` to `path` verbatim, creating parent directories first.
pub fn write_with_parents(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            mkdir_p(parent)?;
        }
    }
    fs::write(path, contents).map_err(Into::into)
}
