// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Platform detection and per-stage applicability sets
//!
//! Stages declare the platforms they apply to instead of scattering
//! OS string comparisons through the pipeline.

use serde::Serialize;

/// Host platform a stage can be gated on.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Windows,
    MacOs,
    LinuxOrOther,
}

impl Platform {
    /// Detect the platform the process is running on.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::LinuxOrOther
        }
    }

    /// Directory inside a virtual environment that holds executables.
    pub fn venv_bin_dir(&self) -> &'static str {
        match self {
            Self::Windows => "Scripts",
            Self::MacOs | Self::LinuxOrOther => "bin",
        }
    }

    /// Suffix appended to executable names on this platform.
    pub fn exe_suffix(&self) -> &'static str {
        match self {
            Self::Windows => ".exe",
            Self::MacOs | Self::LinuxOrOther => "",
        }
    }

    /// Interpreter used to bootstrap the virtual environment.
    pub fn default_python(&self) -> &'static str {
        match self {
            Self::Windows => "python",
            Self::MacOs | Self::LinuxOrOther => "python3",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::MacOs => write!(f, "macos"),
            Self::LinuxOrOther => write!(f, "linux-or-other"),
        }
    }
}

/// Set of platforms a stage applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformSet {
    /// Applies everywhere.
    Any,
    /// Applies only to the listed platforms.
    Of(&'static [Platform]),
}

impl PlatformSet {
    pub const WINDOWS: Self = Self::Of(&[Platform::Windows]);
    pub const DESKTOP: Self = Self::Of(&[Platform::Windows, Platform::MacOs]);

    pub fn contains(&self, platform: Platform) -> bool {
        match self {
            Self::Any => true,
            Self::Of(platforms) => platforms.contains(&platform),
        }
    }
}

impl std::fmt::Display for PlatformSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Of(platforms) => {
                for (i, p) in platforms.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_contains_everything() {
        for p in [Platform::Windows, Platform::MacOs, Platform::LinuxOrOther] {
            assert!(PlatformSet::Any.contains(p));
        }
    }

    #[test]
    fn test_windows_set_excludes_others() {
        assert!(PlatformSet::WINDOWS.contains(Platform::Windows));
        assert!(!PlatformSet::WINDOWS.contains(Platform::MacOs));
        assert!(!PlatformSet::WINDOWS.contains(Platform::LinuxOrOther));
    }

    #[test]
    fn test_desktop_set() {
        assert!(PlatformSet::DESKTOP.contains(Platform::Windows));
        assert!(PlatformSet::DESKTOP.contains(Platform::MacOs));
        assert!(!PlatformSet::DESKTOP.contains(Platform::LinuxOrOther));
    }

    #[test]
    fn test_display() {
        assert_eq!(PlatformSet::Any.to_string(), "any");
        assert_eq!(PlatformSet::DESKTOP.to_string(), "windows, macos");
        assert_eq!(Platform::LinuxOrOther.to_string(), "linux-or-other");
    }

    #[test]
    fn test_venv_layout() {
        assert_eq!(Platform::Windows.venv_bin_dir(), "Scripts");
        assert_eq!(Platform::Windows.exe_suffix(), ".exe");
        assert_eq!(Platform::LinuxOrOther.venv_bin_dir(), "bin");
        assert_eq!(Platform::LinuxOrOther.exe_suffix(), "");
    }
}
