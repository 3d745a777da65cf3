// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for bundleflow.

pub mod build;
pub mod doctor;
pub mod stages;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Packaging flow orchestrator
///
/// Turn a desktop application into platform installers.
#[derive(Parser, Debug)]
#[clap(
    name = "bundleflow",
    version,
    about = "Packaging flow orchestrator that turns a desktop application into platform installers",
    long_about = None,
    after_help = "Examples:\n\
        bundleflow build                Run the packaging pipeline\n\
        bundleflow build -s             Run it without installing dependencies\n\
        bundleflow build --dry-run      Show the execution plan only\n\
        bundleflow doctor               Check required external tools\n\
        bundleflow stages               List pipeline stages and platform gates\n\n\
        See 'bundleflow <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the packaging pipeline
    Build {
        /// Config file
        #[clap(short, long, default_value = ".bundleflow.toml")]
        config: PathBuf,

        /// Skip the dependency-installation stage
        #[clap(short = 's', long)]
        skip_deps: bool,

        /// Show the execution plan without running stages
        #[clap(long)]
        dry_run: bool,
    },

    /// Check that required external tools are available
    Doctor {
        /// Skip package-manager checks (matches `build -s`)
        #[clap(short = 's', long)]
        skip_deps: bool,

        /// Output format (text, json)
        #[clap(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List pipeline stages and their platform gates
    Stages {
        /// Output format (text, json)
        #[clap(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for doctor and stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}
