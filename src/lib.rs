// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! # bundleflow - Packaging Flow Orchestrator
//!
//! `bundleflow` turns a desktop application into platform installers by
//! running a fixed, fail-fast pipeline of external tools.
//!
//! ## Features
//!
//! - **Fixed pipeline** - Dependencies, isolated runtime, freeze, installer,
//!   always in the same order
//! - **Platform gating** - Stages declare where they apply; everything else
//!   is skipped, never reordered
//! - **Fail fast** - The first failing stage aborts the run with its own
//!   exit code
//! - **Clean exit** - Mutated environment variables are restored on every
//!   exit path, including interrupts
//!
//! ## Quick Start
//!
//! ```bash
//! # Describe the application
//! cat > .bundleflow.toml <<'EOF'
//! name = "MyApp"
//! EOF
//!
//! # Check the required external tools
//! bundleflow doctor
//!
//! # Run the pipeline
//! bundleflow build
//! ```

pub mod cli;
pub mod config;
pub mod env_guard;
pub mod errors;
pub mod logger;
pub mod pipeline;
pub mod platform;
pub mod stages;
pub mod template;
pub mod tools;
pub mod utils;
pub mod version;

// Re-export commonly used types
pub use config::BundleConfig;
pub use env_guard::EnvGuard;
pub use errors::{BundleflowError, BundleflowResult};
pub use pipeline::{BuildContext, PipelineRunner, Stage, StageAction};
pub use platform::{Platform, PlatformSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
