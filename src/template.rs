// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Installer script templating
//!
//! Plain token substitution: every `__key__` placeholder is replaced with its
//! value and all other content passes through byte-identical. The installer
//! compiler sees a concrete script, never the template.

use std::path::Path;

use crate::errors::BundleflowError;

/// Placeholder token for the resolved application version.
pub const VERSION_TOKEN: &str = "__version__";

/// Placeholder token for the application name.
pub const NAME_TOKEN: &str = "__name__";

/// Replace every occurrence of each token with its value.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();

    for (token, value) in vars {
        result = result.replace(token, value);
    }

    result
}

/// Count occurrences of a token in a template.
pub fn occurrences(template: &str, token: &str) -> usize {
    template.matches(token).count()
}

/// Render a template file to a concrete output file.
///
/// Returns the number of replaced placeholders, all tokens combined.
pub fn render_file(
    src: &Path,
    dest: &Path,
    vars: &[(&str, &str)],
) -> Result<usize, BundleflowError> {
    let template = std::fs::read_to_string(src).map_err(|e| BundleflowError::FileReadError {
        path: src.to_path_buf(),
        error: e.to_string(),
        help: None,
    })?;

    let replaced: usize = vars.iter().map(|(t, _)| occurrences(&template, t)).sum();
    let rendered = render(&template, vars);

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| BundleflowError::FileWriteError {
            path: dest.to_path_buf(),
            error: e.to_string(),
        })?;
    }

    std::fs::write(dest, rendered).map_err(|e| BundleflowError::FileWriteError {
        path: dest.to_path_buf(),
        error: e.to_string(),
    })?;

    Ok(replaced)
}
