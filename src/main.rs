// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! bundleflow - Packaging Flow Orchestrator
//!
//! Turn a desktop application into platform installers.

use clap::Parser;

use bundleflow::cli::{Cli, Commands};
use bundleflow::errors::BundleflowResult;
use bundleflow::logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logger::init(cli.verbose);

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        if let Err(e) = std::env::set_current_dir(dir) {
            logger::emergency(
                &format!("Failed to change to directory '{}': {}", dir.display(), e),
                1,
            );
        }
    }

    // Dispatch to command handlers
    let result: BundleflowResult<()> = match cli.command {
        Commands::Build {
            config,
            skip_deps,
            dry_run,
        } => bundleflow::cli::build::run(config, skip_deps, dry_run).await,
        Commands::Doctor { skip_deps, format } => {
            bundleflow::cli::doctor::run(skip_deps, format).await
        }
        Commands::Stages { format } => bundleflow::cli::stages::run(format),
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
