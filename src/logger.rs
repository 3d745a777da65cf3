// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Diagnostic output configuration
//!
//! Leveled, timestamped logging via `tracing`, with the minimum level taken
//! from the environment and color applied only on interactive terminals.

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::utils::colors::should_use_colors;

/// Integer verbosity variable: 0 = error, 1 = info, 2 or more = debug.
pub const VERBOSITY_ENV: &str = "BUNDLEFLOW_VERBOSITY";

/// Default minimum level when nothing is configured.
const DEFAULT_LEVEL: Level = Level::INFO;

/// Map a raw verbosity value to a level.
///
/// Malformed values fall back to the default rather than failing the run.
pub fn level_for(raw: Option<&str>) -> Level {
    match raw.map(str::trim).and_then(|v| v.parse::<u8>().ok()) {
        Some(0) => Level::ERROR,
        Some(1) => Level::INFO,
        Some(_) => Level::DEBUG,
        None => DEFAULT_LEVEL,
    }
}

/// Initialize the global subscriber.
///
/// Precedence: an explicit `RUST_LOG`-style filter wins, then the
/// `--verbose` flag, then the integer verbosity variable.
pub fn init(verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else {
        level_for(std::env::var(VERBOSITY_ENV).ok().as_deref())
    };

    colored::control::set_override(should_use_colors());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!("bundleflow={}", level).to_lowercase())
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(should_use_colors()),
        )
        .init();
}

/// Log at error severity, then terminate with a non-zero status.
pub fn emergency(message: &str, code: i32) -> ! {
    tracing::error!("{}", message);
    std::process::exit(if code == 0 { 1 } else { code });
}
