// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Dependency installation stage
//!
//! Installs build prerequisites through the platform package manager. The
//! package manager is an opaque collaborator; only its exit status matters.

use async_trait::async_trait;
use std::ffi::OsStr;

use crate::errors::BundleflowError;
use crate::pipeline::{BuildContext, StageAction};
use crate::platform::Platform;
use crate::tools::{detect, process};

/// Installs configured packages via choco (Windows) or brew (macOS).
pub struct InstallDependencies;

#[async_trait]
impl StageAction for InstallDependencies {
    async fn run(&self, ctx: &mut BuildContext) -> Result<(), BundleflowError> {
        let (manager, base_args, packages) = match ctx.platform {
            Platform::Windows => (
                "choco",
                vec!["install", "-y"],
                ctx.config.packages.windows.clone(),
            ),
            Platform::MacOs => ("brew", vec!["install"], ctx.config.packages.macos.clone()),
            // Platform-gated; the runner never routes other platforms here.
            Platform::LinuxOrOther => return Ok(()),
        };

        if packages.is_empty() {
            tracing::debug!("no packages configured for {}", ctx.platform);
            return Ok(());
        }

        let program = detect::find_tool(manager)?;

        let mut args: Vec<&OsStr> = base_args.iter().map(OsStr::new).collect();
        args.extend(packages.iter().map(|p| OsStr::new(p.as_str())));

        tracing::info!("installing {} package(s) via {}", packages.len(), manager);
        process::run_checked(manager, &program, &args, &ctx.project_root).await?;

        Ok(())
    }
}
