// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Stages command - list the fixed pipeline

use colored::Colorize;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::errors::BundleflowResult;
use crate::platform::Platform;
use crate::stages::{default_pipeline, BuildOptions};
use crate::utils::colors::print_header;

#[derive(Serialize)]
struct StageListing<'a> {
    step: usize,
    name: &'a str,
    summary: &'a str,
    platforms: String,
    applies_here: bool,
}

/// List the pipeline stages with their platform gates.
pub fn run(format: OutputFormat) -> BundleflowResult<()> {
    let platform = Platform::current();
    let stages = default_pipeline(&BuildOptions::default());

    let listings: Vec<StageListing> = stages
        .iter()
        .enumerate()
        .map(|(i, stage)| StageListing {
            step: i + 1,
            name: stage.name,
            summary: stage.summary,
            platforms: stage.platforms.to_string(),
            applies_here: stage.platforms.contains(platform),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&listings)
                    .unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Text => {
            print_header("Pipeline stages");
            println!();

            for listing in &listings {
                let gate = if listing.applies_here {
                    format!("[{}]", listing.platforms).dimmed()
                } else {
                    format!("[{}: skipped here]", listing.platforms).yellow()
                };

                println!(
                    "  {}. {} {}",
                    listing.step,
                    listing.name.bold(),
                    gate
                );
                println!("     {}", listing.summary.dimmed());
            }

            println!();
            println!(
                "Current platform: {}",
                platform.to_string().bold()
            );
        }
    }

    Ok(())
}
