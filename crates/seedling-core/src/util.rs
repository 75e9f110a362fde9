//! Common utility functions.

pub mod data;
pub mod process;
pub mod fs;

// Re-export commonly used items
pub use data::{deep_merge, get_path, load_yaml};
pub use process::{run, ProcessOutput};
pub use fs::{expand_path, slurp};
