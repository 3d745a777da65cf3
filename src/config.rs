// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Project configuration
//!
//! Defines the schema for .bundleflow.toml files: what application is being
//! packaged, where build output goes, and how the external tools are invoked.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::BundleflowError;

/// Project configuration from .bundleflow.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Application name, used for artifact naming and installer metadata
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,

    /// Virtual environment directory, recreated by the provision stage
    #[serde(default = "default_venv_dir")]
    pub venv_dir: PathBuf,

    /// Intermediate build directory (rendered installer script, freeze work)
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    /// Output directory, recreated by the freeze stage
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,

    /// Freezer spec file describing the executable tree to produce
    #[serde(default = "default_freeze_spec")]
    pub freeze_spec: PathBuf,

    /// Installer script template with `__name__`/`__version__` placeholders
    #[serde(default = "default_installer_template")]
    pub installer_template: PathBuf,

    /// Command that prints the application version to stdout
    #[serde(default = "default_version_command")]
    pub version_command: Vec<String>,

    /// Interpreter used to bootstrap the venv (platform default if unset)
    #[serde(default)]
    pub python: Option<String>,

    /// Package-manager packages installed by the install-deps stage
    #[serde(default)]
    pub packages: Packages,
}

/// Per-platform package lists for the dependency stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Packages {
    #[serde(default = "default_windows_packages")]
    pub windows: Vec<String>,

    #[serde(default = "default_macos_packages")]
    pub macos: Vec<String>,
}

impl Default for Packages {
    fn default() -> Self {
        Self {
            windows: default_windows_packages(),
            macos: default_macos_packages(),
        }
    }
}

fn default_venv_dir() -> PathBuf {
    PathBuf::from("build/venv")
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_freeze_spec() -> PathBuf {
    PathBuf::from("app.spec")
}

fn default_installer_template() -> PathBuf {
    PathBuf::from("installer/setup.nsi.in")
}

fn default_version_command() -> Vec<String> {
    vec![
        "python".to_string(),
        "setup.py".to_string(),
        "--version".to_string(),
    ]
}

fn default_windows_packages() -> Vec<String> {
    vec!["python".to_string(), "nsis".to_string()]
}

fn default_macos_packages() -> Vec<String> {
    vec!["python".to_string()]
}

impl BundleConfig {
    /// Default config file name, looked up in the project root.
    pub fn default_path() -> PathBuf {
        PathBuf::from(".bundleflow.toml")
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, BundleflowError> {
        if !path.exists() {
            return Err(BundleflowError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| BundleflowError::FileReadError {
                path: path.to_path_buf(),
                error: e.to_string(),
                help: None,
            })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, BundleflowError> {
        let config: Self = toml::from_str(content)?;

        if config.name.trim().is_empty() {
            return Err(BundleflowError::InvalidConfig {
                reason: "application name is empty".to_string(),
                help: Some("Set `name = \"MyApp\"` in .bundleflow.toml".to_string()),
            });
        }
        if config.version_command.is_empty() {
            return Err(BundleflowError::InvalidConfig {
                reason: "version_command is empty".to_string(),
                help: Some(
                    "Set `version_command = [\"python\", \"setup.py\", \"--version\"]`"
                        .to_string(),
                ),
            });
        }

        Ok(config)
    }
}
