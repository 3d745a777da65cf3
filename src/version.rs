// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Application version resolution
//!
//! The version is derived once per run by querying the application's
//! packaging metadata, then parameterizes artifact naming and installer
//! metadata for the rest of the pipeline. An undeterminable version is a
//! fatal configuration error.

use regex::Regex;

use crate::errors::BundleflowError;

/// Dotted version with optional pre-release/build suffix, e.g. `1.2.3`,
/// `0.179.10`, `2.0.0rc1`.
const VERSION_PATTERN: &str = r"(\d+\.\d+(?:\.\d+)*[0-9A-Za-z.+-]*)";

/// Extract a version string from version-query output.
///
/// The query tool may print warnings or extra lines around the version;
/// the first dotted version found anywhere in the output wins.
pub fn parse_version_output(output: &str) -> Option<String> {
    let re = Regex::new(VERSION_PATTERN).ok()?;
    re.captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches('.').to_string())
}

/// Parse query output, failing with the captured output on an empty or
/// unrecognizable result.
pub fn require_version(output: &str) -> Result<String, BundleflowError> {
    parse_version_output(output).ok_or_else(|| BundleflowError::VersionUnavailable {
        output: excerpt(output),
        help: Some(
            "The version query printed no usable version. \
             Check `version_command` in .bundleflow.toml"
                .to_string(),
        ),
    })
}

/// Trim query output to something safe to embed in a diagnostic.
fn excerpt(output: &str) -> String {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return "<empty output>".to_string();
    }

    const MAX: usize = 200;
    if trimmed.len() > MAX {
        let mut end = MAX;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &trimmed[..end])
    } else {
        trimmed.to_string()
    }
}
