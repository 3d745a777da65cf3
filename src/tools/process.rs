// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Child process execution
//!
//! Runs a tool to completion with captured output. Stage actions block on
//! the child; there is no backgrounding and no retry.

use std::ffi::OsStr;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::process::Command;

use crate::errors::BundleflowError;

/// Outcome of a completed tool invocation
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether the tool exited with status zero
    pub success: bool,

    /// Standard output
    pub stdout: String,

    /// Standard error
    pub stderr: String,

    /// Exit code (-1 when the child died without one)
    pub exit_code: i32,

    /// Wall-clock duration
    pub duration: Duration,
}

/// Run a tool to completion, capturing output.
///
/// A non-zero exit is reported in the result, not as an error; use
/// [`run_checked`] when any failure should abort the stage.
pub async fn run(
    tool: &str,
    program: &Path,
    args: &[&OsStr],
    working_dir: &Path,
) -> Result<ExecutionResult, BundleflowError> {
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.current_dir(working_dir);
    // If the run is interrupted mid-stage, dropping the future must not
    // orphan the child.
    cmd.kill_on_drop(true);

    tracing::debug!("running {}: {:?}", tool, cmd.as_std());

    let output = cmd
        .output()
        .await
        .map_err(|e| BundleflowError::ToolSpawnFailed {
            tool: tool.to_string(),
            error: e.to_string(),
            help: Some(format!("'{}' may not be executable", program.display())),
        })?;

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    Ok(ExecutionResult {
        success: output.status.success(),
        stdout,
        stderr,
        exit_code,
        duration,
    })
}

/// Run a tool, turning a non-zero exit into a fatal error that carries the
/// originating exit code.
pub async fn run_checked(
    tool: &str,
    program: &Path,
    args: &[&OsStr],
    working_dir: &Path,
) -> Result<ExecutionResult, BundleflowError> {
    let result = run(tool, program, args, working_dir).await?;

    if result.success {
        Ok(result)
    } else {
        Err(BundleflowError::ToolExecutionFailed {
            tool: tool.to_string(),
            code: result.exit_code,
            stderr: tail(&result.stderr, 20),
            help: None,
        })
    }
}

/// Last `lines` lines of tool output, for diagnostics.
fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sh() -> PathBuf {
        PathBuf::from("sh")
    }

    #[tokio::test]
    async fn test_captures_stdout() {
        let result = run(
            "sh",
            &sh(),
            &[OsStr::new("-c"), OsStr::new("echo hello")],
            Path::new("."),
        )
        .await
        .unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.contains("hello"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_reported() {
        let result = run(
            "sh",
            &sh(),
            &[OsStr::new("-c"), OsStr::new("exit 3")],
            Path::new("."),
        )
        .await
        .unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 3);
    }

    #[tokio::test]
    async fn test_run_checked_propagates_exit_code() {
        let err = run_checked(
            "sh",
            &sh(),
            &[OsStr::new("-c"), OsStr::new("echo oops >&2; exit 5")],
            Path::new("."),
        )
        .await
        .unwrap_err();

        match err {
            BundleflowError::ToolExecutionFailed { code, stderr, .. } => {
                assert_eq!(code, 5);
                assert!(stderr.contains("oops"));
            }
            other => panic!("expected ToolExecutionFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_failure() {
        let err = run(
            "no-such-tool",
            Path::new("/definitely/not/a/tool"),
            &[],
            Path::new("."),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, BundleflowError::ToolSpawnFailed { .. }));
    }

    #[test]
    fn test_tail() {
        let text = "a\nb\nc\nd";
        assert_eq!(tail(text, 2), "c\nd");
        assert_eq!(tail(text, 10), text);
    }
}
