// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Error types for the packaging pipeline
//!
//! Every fatal condition surfaces to the top level and terminates the run;
//! nothing is retried. Each variant carries enough context to name the
//! failing stage or tool and, for external invocations, the originating
//! exit code.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for bundleflow operations
pub type BundleflowResult<T> = Result<T, BundleflowError>;

/// Exit status used when a child process died without a code (signal).
const FALLBACK_EXIT_CODE: i32 = 1;

/// Exit status for an interrupted run (128 + SIGINT).
const INTERRUPT_EXIT_CODE: i32 = 130;

/// Main error type for bundleflow
#[derive(Error, Debug, Diagnostic)]
pub enum BundleflowError {
    // ─────────────────────────────────────────────────────────────────────────
    // Tool Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Tool '{tool}' not found")]
    #[diagnostic(code(bundleflow::tool_not_found), help("{suggestion}"))]
    ToolNotFound { tool: String, suggestion: String },

    #[error("Tool '{tool}' exited with status {code}")]
    #[diagnostic(code(bundleflow::tool_execution_failed))]
    ToolExecutionFailed {
        tool: String,
        code: i32,
        stderr: String,
        #[help]
        help: Option<String>,
    },

    #[error("Failed to launch '{tool}': {error}")]
    #[diagnostic(code(bundleflow::tool_spawn_failed))]
    ToolSpawnFailed {
        tool: String,
        error: String,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Stage '{stage}' failed at step {step}")]
    #[diagnostic(code(bundleflow::stage_failed))]
    StageFailed {
        stage: String,
        step: usize,
        code: i32,
        #[source]
        source: Box<BundleflowError>,
    },

    #[error("Pipeline interrupted")]
    #[diagnostic(
        code(bundleflow::interrupted),
        help("Partial build output is left in place; re-run the pipeline to rebuild")
    )]
    Interrupted,

    #[error("Could not determine the application version")]
    #[diagnostic(code(bundleflow::version_unavailable))]
    VersionUnavailable {
        output: String,
        #[help]
        help: Option<String>,
    },

    #[error("Version has not been resolved yet")]
    #[diagnostic(
        code(bundleflow::version_not_resolved),
        help("The resolve-version stage must run before version-dependent stages")
    )]
    VersionNotResolved,

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Config file not found: {path}")]
    #[diagnostic(
        code(bundleflow::config_not_found),
        help("Create a .bundleflow.toml describing the application to package")
    )]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {reason}")]
    #[diagnostic(code(bundleflow::invalid_config))]
    InvalidConfig {
        reason: String,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // File Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(bundleflow::file_read_error))]
    FileReadError {
        path: PathBuf,
        error: String,
        #[help]
        help: Option<String>,
    },

    #[error("Failed to write file '{path}': {error}")]
    #[diagnostic(code(bundleflow::file_write_error))]
    FileWriteError { path: PathBuf, error: String },

    #[error("Expected build artifact not found: {pattern}")]
    #[diagnostic(code(bundleflow::missing_artifact))]
    MissingArtifact {
        pattern: String,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(bundleflow::io_error))]
    Io { message: String },

    #[error("TOML parsing error: {message}")]
    #[diagnostic(code(bundleflow::toml_error))]
    Toml { message: String },

    #[error("Glob pattern error: {message}")]
    #[diagnostic(code(bundleflow::glob_error))]
    GlobPattern { message: String },
}

impl From<std::io::Error> for BundleflowError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            message: e.to_string(),
        }
    }
}

impl From<toml::de::Error> for BundleflowError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml {
            message: e.to_string(),
        }
    }
}

impl From<glob::PatternError> for BundleflowError {
    fn from(e: glob::PatternError) -> Self {
        Self::GlobPattern {
            message: e.to_string(),
        }
    }
}

impl BundleflowError {
    /// Create a tool not found error with an installation suggestion
    pub fn tool_not_found(tool: &str) -> Self {
        let suggestion = match tool {
            "makensis" => "Install NSIS 3.x: https://nsis.sourceforge.io/Download".to_string(),
            "choco" => "Install Chocolatey: https://chocolatey.org/install".to_string(),
            "brew" => "Install Homebrew: https://brew.sh".to_string(),
            "python" | "python3" => {
                "Install Python 3: https://www.python.org/downloads/".to_string()
            }
            _ => format!("Install {} and ensure it's in your PATH", tool),
        };

        Self::ToolNotFound {
            tool: tool.to_string(),
            suggestion,
        }
    }

    /// Create a file read error naming the stage that required the file
    pub fn file_read_in_stage(path: PathBuf, error: String, stage: &str) -> Self {
        Self::FileReadError {
            path,
            error,
            help: Some(format!(
                "Required by stage '{}'. Check that the file exists.",
                stage
            )),
        }
    }

    /// Exit status the process should terminate with for this error.
    ///
    /// External invocation failures propagate the originating exit code;
    /// everything else is a generic failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolExecutionFailed { code, .. } | Self::StageFailed { code, .. } => {
                if *code > 0 {
                    *code
                } else {
                    FALLBACK_EXIT_CODE
                }
            }
            Self::Interrupted => INTERRUPT_EXIT_CODE,
            _ => FALLBACK_EXIT_CODE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_propagates_tool_status() {
        let err = BundleflowError::ToolExecutionFailed {
            tool: "makensis".into(),
            code: 3,
            stderr: String::new(),
            help: None,
        };
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_for_signal_death_is_nonzero() {
        let err = BundleflowError::ToolExecutionFailed {
            tool: "pip".into(),
            code: -1,
            stderr: String::new(),
            help: None,
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_stage_failed_carries_inner_code() {
        let inner = BundleflowError::ToolExecutionFailed {
            tool: "pyinstaller".into(),
            code: 7,
            stderr: "boom".into(),
            help: None,
        };
        let err = BundleflowError::StageFailed {
            stage: "freeze".into(),
            step: 6,
            code: inner.exit_code(),
            source: Box::new(inner),
        };
        assert_eq!(err.exit_code(), 7);
        assert!(err.to_string().contains("freeze"));
    }

    #[test]
    fn test_interrupt_exit_code() {
        assert_eq!(BundleflowError::Interrupted.exit_code(), 130);
    }

    #[test]
    fn test_tool_not_found_suggestions() {
        match BundleflowError::tool_not_found("makensis") {
            BundleflowError::ToolNotFound { suggestion, .. } => {
                assert!(suggestion.contains("nsis.sourceforge.io"));
            }
            _ => panic!("expected ToolNotFound"),
        }

        match BundleflowError::tool_not_found("frobnicator") {
            BundleflowError::ToolNotFound { suggestion, .. } => {
                assert!(suggestion.contains("PATH"));
            }
            _ => panic!("expected ToolNotFound"),
        }
    }
}
