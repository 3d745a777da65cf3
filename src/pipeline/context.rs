// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Build context threaded through the pipeline
//!
//! Carries the loaded configuration, the detected platform, the environment
//! guard, and the state stages produce for later stages (the resolved
//! version, artifact paths).

use std::path::PathBuf;

use crate::config::BundleConfig;
use crate::env_guard::EnvGuard;
use crate::errors::BundleflowError;
use crate::platform::Platform;

/// Mutable state shared by all stages of one pipeline run
pub struct BuildContext {
    pub config: BundleConfig,
    pub platform: Platform,
    pub project_root: PathBuf,
    pub env: EnvGuard,
    version: Option<String>,
    artifacts: Vec<PathBuf>,
}

impl BuildContext {
    pub fn new(config: BundleConfig, project_root: PathBuf) -> Self {
        Self::for_platform(config, project_root, Platform::current())
    }

    /// Build a context for an explicit platform (tests, cross-checks).
    pub fn for_platform(config: BundleConfig, project_root: PathBuf, platform: Platform) -> Self {
        Self {
            config,
            platform,
            project_root,
            env: EnvGuard::new(),
            version: None,
            artifacts: Vec::new(),
        }
    }

    /// The resolved application version.
    ///
    /// Version-dependent stages call this; it fails if the resolve-version
    /// stage has not stored a value yet.
    pub fn version(&self) -> Result<&str, BundleflowError> {
        self.version
            .as_deref()
            .ok_or(BundleflowError::VersionNotResolved)
    }

    /// Store the version derived from the packaging metadata query.
    /// Immutable for the remainder of the run.
    pub fn set_version(&mut self, version: String) {
        debug_assert!(self.version.is_none(), "version resolved twice");
        self.version = Some(version);
    }

    /// Record a produced artifact for the final report.
    pub fn add_artifact(&mut self, path: PathBuf) {
        self.artifacts.push(path);
    }

    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    // ── path helpers ────────────────────────────────────────────────────────

    pub fn venv_dir(&self) -> PathBuf {
        self.project_root.join(&self.config.venv_dir)
    }

    pub fn venv_bin_dir(&self) -> PathBuf {
        self.venv_dir().join(self.platform.venv_bin_dir())
    }

    /// Path of an executable inside the virtual environment.
    pub fn venv_tool(&self, name: &str) -> PathBuf {
        self.venv_bin_dir()
            .join(format!("{}{}", name, self.platform.exe_suffix()))
    }

    pub fn build_dir(&self) -> PathBuf {
        self.project_root.join(&self.config.build_dir)
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.project_root.join(&self.config.dist_dir)
    }

    /// Rendered installer script location.
    pub fn installer_script(&self) -> PathBuf {
        self.build_dir().join("installer.nsi")
    }

    pub fn installer_template(&self) -> PathBuf {
        self.project_root.join(&self.config.installer_template)
    }

    pub fn freeze_spec(&self) -> PathBuf {
        self.project_root.join(&self.config.freeze_spec)
    }

    /// Interpreter used to bootstrap the venv.
    pub fn bootstrap_python(&self) -> &str {
        self.config
            .python
            .as_deref()
            .unwrap_or_else(|| self.platform.default_python())
    }
}

impl std::fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildContext")
            .field("platform", &self.platform)
            .field("project_root", &self.project_root)
            .field("version", &self.version)
            .field("artifacts", &self.artifacts)
            .finish_non_exhaustive()
    }
}
