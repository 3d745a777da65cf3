// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Progress output
//!
//! Step-indexed stage lines for the pipeline runner and a spinner for
//! longer probes.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Prints one line per pipeline stage, indexed by step.
pub struct StageTracker {
    total: usize,
    step: usize,
}

impl StageTracker {
    pub fn new(total: usize) -> Self {
        Self { total, step: 0 }
    }

    /// 1-based index of the stage currently being reported.
    pub fn step(&self) -> usize {
        self.step
    }

    fn prefix(&self) -> String {
        format!("[{}/{}]", self.step, self.total)
    }

    pub fn start(&mut self, name: &str) {
        self.step += 1;
        println!("  {} {} {}...", "→".blue(), self.prefix().dimmed(), name);
    }

    pub fn complete(&self, name: &str, duration: Duration) {
        println!(
            "\x1b[1A\x1b[2K  {} {} {} ({:.2}s)",
            "✓".green(),
            self.prefix().dimmed(),
            name.bold(),
            duration.as_secs_f64()
        );
    }

    pub fn fail(&self, name: &str) {
        println!(
            "\x1b[1A\x1b[2K  {} {} {} failed",
            "✗".red(),
            self.prefix().dimmed(),
            name.bold()
        );
    }

    pub fn skip(&mut self, name: &str, reason: &str) {
        self.step += 1;
        println!(
            "  {} {} {} {}",
            "○".dimmed(),
            self.prefix().dimmed(),
            name.dimmed(),
            format!("(skipped: {})", reason).dimmed()
        );
    }
}
