// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Pipeline core
//!
//! The data model and runner for the fixed, linearly ordered packaging
//! pipeline: stages, the build context they share, and the fail-fast
//! execution loop.

mod context;
mod runner;
mod stage;

pub use context::BuildContext;
pub use runner::{PipelineRunner, RunReport, RunState};
pub use stage::{Stage, StageAction, StageCondition};
