// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Tool detection
//!
//! Locates required external tools on the search path. A missing required
//! tool is a configuration error, raised by the stage that needs it.

use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::errors::BundleflowError;
use crate::platform::Platform;
use crate::tools::process;

/// Locate a tool on the search path.
pub fn find_tool(name: &str) -> Result<PathBuf, BundleflowError> {
    which::which(name).map_err(|_| BundleflowError::tool_not_found(name))
}

/// Availability report for one external tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    pub name: String,

    /// Resolved path, if the tool was found
    pub path: Option<PathBuf>,

    /// First line of the tool's version output, if it could be queried
    pub version: Option<String>,

    /// Whether the packaging pipeline needs this tool on this platform
    pub required: bool,
}

impl ToolStatus {
    pub fn available(&self) -> bool {
        self.path.is_some()
    }
}

/// Probe one tool: locate it and query its version.
pub async fn probe(name: &str, version_arg: &str, required: bool) -> ToolStatus {
    let Ok(path) = which::which(name) else {
        tracing::debug!("{} not found in PATH", name);
        return ToolStatus {
            name: name.to_string(),
            path: None,
            version: None,
            required,
        };
    };

    let version = match process::run(
        name,
        &path,
        &[OsStr::new(version_arg)],
        Path::new("."),
    )
    .await
    {
        Ok(result) if result.success => result
            .stdout
            .lines()
            .chain(result.stderr.lines())
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(String::from),
        _ => None,
    };

    ToolStatus {
        name: name.to_string(),
        path: Some(path),
        version,
        required,
    }
}

/// Tools the pipeline may invoke on the given platform, with the flag used
/// to query their version: (name, version flag, required).
pub fn tool_manifest(platform: Platform, skip_deps: bool) -> Vec<(&'static str, &'static str, bool)> {
    let mut tools = vec![(platform.default_python(), "--version", true)];

    match platform {
        Platform::Windows => {
            if !skip_deps {
                tools.push(("choco", "--version", true));
            }
            // makensis reports its version with a single dash.
            tools.push(("makensis", "-VERSION", true));
        }
        Platform::MacOs => {
            if !skip_deps {
                tools.push(("brew", "--version", true));
            }
        }
        Platform::LinuxOrOther => {}
    }

    tools
}
