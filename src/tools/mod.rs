// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! External tool invocation
//!
//! The pipeline treats every external collaborator (package manager, venv
//! tool, pip, freezer, installer compiler) as a black box: a command name,
//! exit-code-zero-success semantics, and captured output.

pub mod detect;
pub mod process;

pub use detect::{find_tool, probe, ToolStatus};
pub use process::{run, run_checked, ExecutionResult};
