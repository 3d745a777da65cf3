// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Guarded mutation of process-wide environment variables
//!
//! The pipeline activates the provisioned virtual environment by mutating
//! search-path variables for the whole process. `EnvGuard` snapshots the
//! prior state of every variable it touches and restores it on run end,
//! whichever exit path is taken.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::Path;

/// Capture/restore discipline for process environment variables.
///
/// A variable is snapshotted the first time it is touched (either via
/// [`capture`](Self::capture) or implicitly on [`set`](Self::set)).
/// [`restore`](Self::restore) reinstates each captured variable to its exact
/// prior value, or removes it if it was previously unset. Restoration is
/// idempotent and also runs from `Drop` as a backstop.
#[derive(Debug, Default)]
pub struct EnvGuard {
    saved: Vec<(String, Option<OsString>)>,
    captured: HashSet<String>,
    restored: bool,
}

impl EnvGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current values (or absence) of the named variables.
    pub fn capture<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.snapshot(&name.into());
        }
    }

    fn snapshot(&mut self, name: &str) {
        if self.captured.insert(name.to_string()) {
            self.saved.push((name.to_string(), std::env::var_os(name)));
        }
    }

    /// Overwrite a variable, snapshotting its prior state first.
    pub fn set(&mut self, name: &str, value: impl AsRef<std::ffi::OsStr>) {
        self.snapshot(name);
        std::env::set_var(name, value);
    }

    /// Prepend a directory to a search-path-like variable (e.g. `PATH`).
    pub fn prepend_path(&mut self, name: &str, dir: &Path) {
        self.snapshot(name);

        let mut parts = vec![dir.to_path_buf()];
        if let Some(existing) = std::env::var_os(name) {
            parts.extend(std::env::split_paths(&existing));
        }

        // join_paths only fails on separator characters inside an entry;
        // in that case the variable is left untouched.
        if let Ok(joined) = std::env::join_paths(parts) {
            std::env::set_var(name, joined);
        }
    }

    /// Reinstate every captured variable. Safe to call more than once.
    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        // Restore in reverse capture order.
        for (name, value) in self.saved.iter().rev() {
            match value {
                Some(v) => std::env::set_var(name, v),
                None => std::env::remove_var(name),
            }
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names: the test harness runs tests
    // in parallel within one process environment.

    #[test]
    fn test_restores_prior_value() {
        std::env::set_var("BUNDLEFLOW_TEST_PRIOR", "original");

        let mut guard = EnvGuard::new();
        guard.set("BUNDLEFLOW_TEST_PRIOR", "mutated");
        assert_eq!(
            std::env::var("BUNDLEFLOW_TEST_PRIOR").unwrap(),
            "mutated"
        );

        guard.restore();
        assert_eq!(
            std::env::var("BUNDLEFLOW_TEST_PRIOR").unwrap(),
            "original"
        );

        std::env::remove_var("BUNDLEFLOW_TEST_PRIOR");
    }

    #[test]
    fn test_restores_prior_absence() {
        std::env::remove_var("BUNDLEFLOW_TEST_ABSENT");

        let mut guard = EnvGuard::new();
        guard.set("BUNDLEFLOW_TEST_ABSENT", "mutated");
        assert!(std::env::var("BUNDLEFLOW_TEST_ABSENT").is_ok());

        guard.restore();
        assert!(std::env::var("BUNDLEFLOW_TEST_ABSENT").is_err());
    }

    #[test]
    fn test_first_snapshot_wins() {
        std::env::set_var("BUNDLEFLOW_TEST_FIRST", "original");

        let mut guard = EnvGuard::new();
        guard.set("BUNDLEFLOW_TEST_FIRST", "one");
        guard.set("BUNDLEFLOW_TEST_FIRST", "two");
        guard.restore();

        assert_eq!(
            std::env::var("BUNDLEFLOW_TEST_FIRST").unwrap(),
            "original"
        );

        std::env::remove_var("BUNDLEFLOW_TEST_FIRST");
    }

    #[test]
    fn test_restore_is_idempotent() {
        std::env::set_var("BUNDLEFLOW_TEST_IDEM", "original");

        let mut guard = EnvGuard::new();
        guard.set("BUNDLEFLOW_TEST_IDEM", "mutated");
        guard.restore();

        // A mutation after restore must not be undone by a second call.
        std::env::set_var("BUNDLEFLOW_TEST_IDEM", "later");
        guard.restore();
        assert_eq!(std::env::var("BUNDLEFLOW_TEST_IDEM").unwrap(), "later");

        std::env::remove_var("BUNDLEFLOW_TEST_IDEM");
    }

    #[test]
    fn test_drop_restores() {
        std::env::remove_var("BUNDLEFLOW_TEST_DROP");

        {
            let mut guard = EnvGuard::new();
            guard.set("BUNDLEFLOW_TEST_DROP", "mutated");
        }

        assert!(std::env::var("BUNDLEFLOW_TEST_DROP").is_err());
    }

    #[test]
    fn test_prepend_path() {
        std::env::set_var("BUNDLEFLOW_TEST_PATH", "/usr/bin");

        let mut guard = EnvGuard::new();
        guard.prepend_path("BUNDLEFLOW_TEST_PATH", Path::new("/opt/venv/bin"));

        let value = std::env::var("BUNDLEFLOW_TEST_PATH").unwrap();
        let entries: Vec<_> = std::env::split_paths(&value).collect();
        assert_eq!(entries[0], Path::new("/opt/venv/bin"));
        assert!(entries.contains(&std::path::PathBuf::from("/usr/bin")));

        guard.restore();
        assert_eq!(std::env::var("BUNDLEFLOW_TEST_PATH").unwrap(), "/usr/bin");

        std::env::remove_var("BUNDLEFLOW_TEST_PATH");
    }
}
