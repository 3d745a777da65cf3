// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Build command - run the packaging pipeline

use colored::Colorize;
use std::path::PathBuf;

use crate::config::BundleConfig;
use crate::errors::BundleflowResult;
use crate::pipeline::{BuildContext, PipelineRunner, Stage, StageCondition};
use crate::platform::Platform;
use crate::stages::{default_pipeline, BuildOptions};
use crate::tools::detect;

/// Run the pipeline
pub async fn run(config_path: PathBuf, skip_deps: bool, dry_run: bool) -> BundleflowResult<()> {
    let config = BundleConfig::from_file(&config_path)?;
    let platform = Platform::current();
    let options = BuildOptions { skip_deps };
    let stages = default_pipeline(&options);

    print_execution_plan(&config, &stages, platform);

    if dry_run {
        return Ok(());
    }

    // The package manager is the one tool a run cannot install for itself.
    if !skip_deps {
        preflight_package_manager(platform)?;
    }

    let project_root = std::env::current_dir()?;
    let mut ctx = BuildContext::for_platform(config, project_root, platform);
    let mut runner = PipelineRunner::new();

    let report = runner.run(&stages, &mut ctx).await?;

    if !ctx.artifacts().is_empty() {
        println!();
        println!("{}:", "Artifacts".bold());
        for artifact in ctx.artifacts() {
            println!("  - {}", artifact.display());
        }
    }

    tracing::debug!(
        "run finished in {:.2}s",
        report.duration.as_secs_f64()
    );

    Ok(())
}

/// Fail early if the platform package manager is missing.
fn preflight_package_manager(platform: Platform) -> BundleflowResult<()> {
    let manager = match platform {
        Platform::Windows => "choco",
        Platform::MacOs => "brew",
        Platform::LinuxOrOther => return Ok(()),
    };

    detect::find_tool(manager).map(|_| ()).map_err(|err| {
        tracing::debug!("package manager preflight failed: {}", err);
        err
    })
}

/// Print the execution plan
fn print_execution_plan(config: &BundleConfig, stages: &[Stage], platform: Platform) {
    println!();
    println!("{}: {}", "Packaging".bold(), config.name);
    println!("{}", "═".repeat(50));
    println!("Execution plan on {} ({} stages):", platform, stages.len());
    println!();

    for (i, stage) in stages.iter().enumerate() {
        let annotation = if stage.condition == StageCondition::Never {
            " [skipped: disabled]".to_string()
        } else if !stage.platforms.contains(platform) {
            format!(" [skipped: requires {}]", stage.platforms)
        } else {
            String::new()
        };

        println!(
            "  {}. {}{}",
            i + 1,
            stage.name.bold(),
            annotation.dimmed()
        );
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BundleflowError;

    #[tokio::test]
    async fn test_missing_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(dir.path().join(".bundleflow.toml"), false, true).await;
        assert!(matches!(result, Err(BundleflowError::ConfigNotFound { .. })));
    }

    #[tokio::test]
    async fn test_dry_run_stops_before_tooling() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(".bundleflow.toml");
        std::fs::write(&config_path, "name = \"App\"\n").unwrap();

        // No python, pip, or makensis exists in this environment's
        // expectations; dry-run must succeed regardless.
        run(config_path, false, true).await.unwrap();
    }
}
