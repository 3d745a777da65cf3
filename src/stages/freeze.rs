// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Freeze stage
//!
//! Invokes the freezer to bundle the installed application into a
//! standalone executable tree under the dist directory. The dist directory
//! is recreated from scratch on every run.

use async_trait::async_trait;
use std::ffi::OsStr;

use crate::errors::BundleflowError;
use crate::pipeline::{BuildContext, StageAction};
use crate::platform::Platform;
use crate::tools::process;

/// Runs the freezer against the configured spec file.
pub struct FreezeApp;

#[async_trait]
impl StageAction for FreezeApp {
    async fn run(&self, ctx: &mut BuildContext) -> Result<(), BundleflowError> {
        let spec = ctx.freeze_spec();
        if !spec.exists() {
            return Err(BundleflowError::file_read_in_stage(
                spec,
                "no such file".to_string(),
                "freeze",
            ));
        }

        let dist_dir = ctx.dist_dir();
        match tokio::fs::remove_dir_all(&dist_dir).await {
            Ok(()) => tracing::debug!("removed stale dist tree at {}", dist_dir.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tokio::fs::create_dir_all(&dist_dir).await?;

        let work_dir = ctx.build_dir().join("freeze");
        let freezer = ctx.venv_tool("pyinstaller");

        tracing::info!("freezing application from {}", spec.display());
        process::run_checked(
            "pyinstaller",
            &freezer,
            &[
                OsStr::new("--noconfirm"),
                OsStr::new("--distpath"),
                dist_dir.as_os_str(),
                OsStr::new("--workpath"),
                work_dir.as_os_str(),
                spec.as_os_str(),
            ],
            &ctx.project_root,
        )
        .await?;

        // On macOS the freezer emits the app bundle directly; that bundle
        // is the run's artifact. Elsewhere the tree feeds the installer
        // compiler.
        if ctx.platform == Platform::MacOs {
            let pattern = format!("{}/*.app", dist_dir.display());
            let bundle = glob::glob(&pattern)?
                .filter_map(Result::ok)
                .next()
                .ok_or_else(|| BundleflowError::MissingArtifact {
                    pattern,
                    help: Some(
                        "The freezer completed but produced no .app bundle; \
                         check the freeze spec"
                            .to_string(),
                    ),
                })?;
            ctx.add_artifact(bundle);
        }

        Ok(())
    }
}
