// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Runtime provisioning stages
//!
//! Recreates the isolated interpreter environment, installs the application
//! into it, and derives the application version from its packaging
//! metadata.

use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::PathBuf;

use crate::errors::BundleflowError;
use crate::pipeline::{BuildContext, StageAction};
use crate::tools::{detect, process};
use crate::version;

/// Deletes and recreates the virtual environment, then activates it by
/// putting its bin directory first on the search path.
pub struct ProvisionVenv;

#[async_trait]
impl StageAction for ProvisionVenv {
    async fn run(&self, ctx: &mut BuildContext) -> Result<(), BundleflowError> {
        let python = detect::find_tool(ctx.bootstrap_python())?;
        let venv_dir = ctx.venv_dir();

        // A stale venv is removed wholesale; venv creation is not
        // incremental.
        match tokio::fs::remove_dir_all(&venv_dir).await {
            Ok(()) => tracing::debug!("removed stale venv at {}", venv_dir.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        tracing::info!("creating virtual environment at {}", venv_dir.display());
        process::run_checked(
            "python",
            &python,
            &[OsStr::new("-m"), OsStr::new("venv"), venv_dir.as_os_str()],
            &ctx.project_root,
        )
        .await?;

        // Activation for the rest of the run. The guard snapshots the prior
        // values and the runner restores them on every exit path.
        let bin_dir = ctx.venv_bin_dir();
        ctx.env.prepend_path("PATH", &bin_dir);
        ctx.env.set("VIRTUAL_ENV", venv_dir.as_os_str());

        Ok(())
    }
}

/// Installs the application package into the virtual environment.
pub struct InstallApp;

#[async_trait]
impl StageAction for InstallApp {
    async fn run(&self, ctx: &mut BuildContext) -> Result<(), BundleflowError> {
        let pip = ctx.venv_tool("pip");

        tracing::info!("installing application into the virtual environment");
        process::run_checked(
            "pip",
            &pip,
            &[
                OsStr::new("install"),
                OsStr::new("--upgrade"),
                OsStr::new("."),
            ],
            &ctx.project_root,
        )
        .await?;

        Ok(())
    }
}

/// Queries the application's packaging metadata for its version string.
///
/// The version is resolved once and is immutable for the rest of the run;
/// an undeterminable version aborts the pipeline before any
/// version-dependent stage.
pub struct ResolveVersion;

impl ResolveVersion {
    /// Resolve the program named by the configured version command.
    ///
    /// A bare interpreter name points into the venv so the query sees the
    /// installed package; anything else is looked up on the search path.
    fn resolve_program(ctx: &BuildContext, program: &str) -> Result<PathBuf, BundleflowError> {
        if program == "python" || program == "python3" {
            Ok(ctx.venv_tool("python"))
        } else {
            detect::find_tool(program)
        }
    }
}

#[async_trait]
impl StageAction for ResolveVersion {
    async fn run(&self, ctx: &mut BuildContext) -> Result<(), BundleflowError> {
        let command = ctx.config.version_command.clone();
        let program = Self::resolve_program(ctx, &command[0])?;
        let args: Vec<&OsStr> = command[1..].iter().map(|a| OsStr::new(a.as_str())).collect();

        let result =
            process::run_checked(&command[0], &program, &args, &ctx.project_root).await?;

        let resolved = version::require_version(&result.stdout)?;
        tracing::info!("application version: {}", resolved);
        ctx.set_version(resolved);

        Ok(())
    }
}
