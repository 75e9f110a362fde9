//! Process execution utilities.

use seedling_types::{SeedlingError, Result};
use std::ffi::OsStr;
use std::process::{Command, Stdio};

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Exit code, -1 when terminated by a signal
    pub code: i32,
    /// Standard error, lossily decoded
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the command exited with status zero.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Execute a command synchronously with stdin closed.
///
/// Failing to start the command at all (e.g. binary not installed) is
/// reported as a `Process` error with code -1.
pub fn run<S, I, A>(command: S, args: I) -> Result<ProcessOutput>
where
    S: AsRef<OsStr>,
    I: IntoIterator<Item = A>,
    A: AsRef<OsStr>,
{
    let command = command.as_ref();
    let tool = command.to_string_lossy().to_string();

    let mut cmd = Command::new(command);
    cmd.args(args).stdin(Stdio::null());
    tracing::debug!("Running {:?}", cmd);

    let output = cmd.output().map_err(|e| SeedlingError::Process {
        tool: tool.clone(),
        code: -1,
        stderr: format!("failed to start: {}", e),
    })?;

    Ok(ProcessOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        code: output.status.code().unwrap_or(-1),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Execute a command and fail unless it exits with status zero.
pub fn run_checked<S, I, A>(command: S, args: I) -> Result<ProcessOutput>
where
    S: AsRef<OsStr>,
    I: IntoIterator<Item = A>,
    A: AsRef<OsStr>,
{
    let tool = command.as_ref().to_string_lossy().to_string();
    let output = run(command, args)?;

    if !output.success() {
        return Err(SeedlingError::Process {
            tool,
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        });
    }

    tracing::trace!("{} output: {}", tool, output.stdout.trim());
    Ok(output)
}
