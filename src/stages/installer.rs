// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Installer stages
//!
//! Renders the installer script from its template and compiles it with the
//! NSIS compiler into a single versioned setup executable.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::errors::BundleflowError;
use crate::pipeline::{BuildContext, StageAction};
use crate::template;
use crate::tools::{detect, process};

/// Substitutes the resolved version and application name into the
/// installer script template.
pub struct RenderInstallerScript;

#[async_trait]
impl StageAction for RenderInstallerScript {
    async fn run(&self, ctx: &mut BuildContext) -> Result<(), BundleflowError> {
        let version = ctx.version()?.to_string();
        let name = ctx.config.name.clone();
        let src = ctx.installer_template();
        let dest = ctx.installer_script();

        if !src.exists() {
            return Err(BundleflowError::file_read_in_stage(
                src,
                "no such file".to_string(),
                "render-installer-script",
            ));
        }

        let replaced = template::render_file(
            &src,
            &dest,
            &[
                (template::NAME_TOKEN, name.as_str()),
                (template::VERSION_TOKEN, version.as_str()),
            ],
        )?;

        if replaced == 0 {
            tracing::warn!(
                "installer template {} contains no placeholders",
                src.display()
            );
        } else {
            tracing::debug!("substituted {} placeholder(s) into {}", replaced, dest.display());
        }

        Ok(())
    }
}

/// Compiles the rendered script with makensis and locates the produced
/// setup executable.
pub struct CompileInstaller;

impl CompileInstaller {
    /// The artifact name the installer script is expected to produce.
    fn expected_artifact(ctx: &BuildContext) -> Result<PathBuf, BundleflowError> {
        let version = ctx.version()?;
        Ok(ctx
            .dist_dir()
            .join(format!("{}-{}-setup.exe", ctx.config.name, version)))
    }

    /// Locate the setup executable, falling back to a glob when the script
    /// names its output differently.
    fn locate_artifact(ctx: &BuildContext) -> Result<PathBuf, BundleflowError> {
        let expected = Self::expected_artifact(ctx)?;
        if expected.exists() {
            return Ok(expected);
        }

        let pattern = format!("{}/*.exe", ctx.dist_dir().display());
        glob::glob(&pattern)?
            .filter_map(Result::ok)
            .next()
            .ok_or_else(|| BundleflowError::MissingArtifact {
                pattern,
                help: Some(
                    "makensis succeeded but no setup executable appeared in the \
                     dist directory; check the OutFile directive in the installer \
                     template"
                        .to_string(),
                ),
            })
    }
}

#[async_trait]
impl StageAction for CompileInstaller {
    async fn run(&self, ctx: &mut BuildContext) -> Result<(), BundleflowError> {
        let makensis = detect::find_tool("makensis")?;
        let script = ctx.installer_script();

        tracing::info!("compiling installer from {}", script.display());
        process::run_checked(
            "makensis",
            &makensis,
            &[script.as_os_str()],
            &ctx.project_root,
        )
        .await?;

        let artifact = Self::locate_artifact(ctx)?;
        tracing::info!("installer written to {}", artifact.display());
        ctx.add_artifact(artifact);

        Ok(())
    }
}
