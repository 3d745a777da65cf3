// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! The fixed packaging pipeline
//!
//! Assembles the ordered stage list. The order is a fixed contract:
//! dependencies, then the isolated runtime, then the application, then the
//! version-dependent packaging steps.

mod deps;
mod freeze;
mod installer;
mod python;

pub use deps::InstallDependencies;
pub use freeze::FreezeApp;
pub use installer::{CompileInstaller, RenderInstallerScript};
pub use python::{InstallApp, ProvisionVenv, ResolveVersion};

use crate::pipeline::{Stage, StageCondition};
use crate::platform::PlatformSet;

/// Run options that shape the pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Skip the dependency-installation stage entirely (`-s`)
    pub skip_deps: bool,
}

/// Build the fixed stage list.
pub fn default_pipeline(options: &BuildOptions) -> Vec<Stage> {
    let deps_condition = if options.skip_deps {
        StageCondition::Never
    } else {
        StageCondition::Always
    };

    vec![
        Stage::new(
            "install-deps",
            "Install build prerequisites via the platform package manager",
            PlatformSet::DESKTOP,
            InstallDependencies,
        )
        .with_condition(deps_condition),
        Stage::new(
            "provision-venv",
            "Recreate the isolated Python environment",
            PlatformSet::Any,
            ProvisionVenv,
        ),
        Stage::new(
            "install-app",
            "Install the application into the environment",
            PlatformSet::Any,
            InstallApp,
        ),
        Stage::new(
            "resolve-version",
            "Query the application version from its packaging metadata",
            PlatformSet::Any,
            ResolveVersion,
        ),
        Stage::new(
            "render-installer-script",
            "Render the installer script from its template",
            PlatformSet::WINDOWS,
            RenderInstallerScript,
        ),
        Stage::new(
            "freeze",
            "Bundle the application into a standalone executable tree",
            PlatformSet::Any,
            FreezeApp,
        ),
        Stage::new(
            "compile-installer",
            "Compile the Windows setup executable",
            PlatformSet::WINDOWS,
            CompileInstaller,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;

    #[test]
    fn test_stage_order_is_fixed() {
        let stages = default_pipeline(&BuildOptions::default());
        let names: Vec<_> = stages.iter().map(|s| s.name).collect();

        assert_eq!(
            names,
            vec![
                "install-deps",
                "provision-venv",
                "install-app",
                "resolve-version",
                "render-installer-script",
                "freeze",
                "compile-installer",
            ]
        );
    }

    #[test]
    fn test_platform_gates() {
        let stages = default_pipeline(&BuildOptions::default());

        let gate = |name: &str| {
            stages
                .iter()
                .find(|s| s.name == name)
                .map(|s| s.platforms)
                .unwrap()
        };

        assert!(!gate("install-deps").contains(Platform::LinuxOrOther));
        assert!(gate("install-deps").contains(Platform::Windows));
        assert!(gate("install-deps").contains(Platform::MacOs));

        assert!(gate("render-installer-script").contains(Platform::Windows));
        assert!(!gate("render-installer-script").contains(Platform::MacOs));

        assert!(!gate("compile-installer").contains(Platform::LinuxOrOther));
        assert!(gate("freeze").contains(Platform::LinuxOrOther));
    }

    #[test]
    fn test_skip_deps_disables_only_the_deps_stage() {
        let stages = default_pipeline(&BuildOptions { skip_deps: true });

        assert_eq!(stages[0].name, "install-deps");
        assert_eq!(stages[0].condition, StageCondition::Never);
        assert!(stages[1..]
            .iter()
            .all(|s| s.condition == StageCondition::Always));
    }
}
