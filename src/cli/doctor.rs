// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Doctor command - check external tool availability

use colored::Colorize;

use crate::cli::OutputFormat;
use crate::errors::{BundleflowError, BundleflowResult};
use crate::platform::Platform;
use crate::tools::detect;
use crate::utils::colors::print_header;
use crate::utils::progress::create_spinner;

/// Probe the tools the pipeline will invoke on this platform.
pub async fn run(skip_deps: bool, format: OutputFormat) -> BundleflowResult<()> {
    let platform = Platform::current();
    let manifest = detect::tool_manifest(platform, skip_deps);

    let spinner = (format == OutputFormat::Text).then(|| create_spinner("Checking tools..."));

    let mut statuses = Vec::with_capacity(manifest.len());
    for (name, version_arg, required) in manifest {
        statuses.push(detect::probe(name, version_arg, required).await);
    }

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let missing_required: Vec<_> = statuses
        .iter()
        .filter(|s| s.required && !s.available())
        .collect();

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&statuses)
                    .unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Text => {
            print_header(&format!("Tool check ({})", platform));
            println!();

            for status in &statuses {
                if let Some(path) = &status.path {
                    let version = status.version.as_deref().unwrap_or("version unknown");
                    println!(
                        "  {} {} {} {}",
                        "✓".green(),
                        status.name.bold(),
                        version,
                        format!("({})", path.display()).dimmed()
                    );
                } else if status.required {
                    println!("  {} {} {}", "✗".red(), status.name.bold(), "missing".red());
                } else {
                    println!("  {} {} missing (optional)", "○".dimmed(), status.name);
                }
            }

            println!();
            if missing_required.is_empty() {
                println!("{}", "All required tools are available.".green().bold());
            } else {
                for status in &missing_required {
                    if let BundleflowError::ToolNotFound { suggestion, .. } =
                        BundleflowError::tool_not_found(&status.name)
                    {
                        println!("  Install {}: {}", status.name.bold(), suggestion.cyan());
                    }
                }
            }
        }
    }

    if missing_required.is_empty() {
        Ok(())
    } else {
        Err(BundleflowError::InvalidConfig {
            reason: format!(
                "{} required tool(s) missing: {}",
                missing_required.len(),
                missing_required
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            help: Some("Run 'bundleflow build' without -s to install them, or install manually".to_string()),
        })
    }
}
