//! Blocking execution of external programs.

use crate::error::{ArchiverError, ArchiverResult};
use std::ffi::OsStr;
use std::process::{Command, Output, Stdio};
use tracing::debug;

/// Runs `program` with `args`, capturing its output. A spawn failure or a
/// non-zero exit becomes [`ArchiverError::CommandFailed`].
pub fn run_command<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    context: &str,
) -> ArchiverResult<Output> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| ArchiverError::CommandFailed {
            context: context.to_string(),
            status: "not started".to_string(),
            stderr: format!("failed to run {}: {}", program, e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ArchiverError::CommandFailed {
            context: context.to_string(),
            status: output.status.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(output)
}

/// Runs an opaque command line through `sh -c`. Output goes straight to the
/// terminal so that mount helpers can prompt for passwords.
pub fn run_shell(command_line: &str, context: &str) -> ArchiverResult<()> {
    debug!(command = command_line, context, "Running shell command");

    let status = Command::new("sh")
        .arg("-c")
        .arg(command_line)
        .status()
        .map_err(|e| ArchiverError::CommandFailed {
            context: context.to_string(),
            status: "not started".to_string(),
            stderr: format!("failed to run sh: {}", e),
        })?;

    if !status.success() {
        return Err(ArchiverError::CommandFailed {
            context: context.to_string(),
            status: status.to_string(),
            stderr: format!("`{}` exited unsuccessfully", command_line),
        });
    }

    Ok(())
}
