// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Utility modules
//!
//! Common utilities for the bundleflow CLI.

pub mod colors;
pub mod progress;

pub use colors::*;
pub use progress::*;
