// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Stage definitions
//!
//! A stage is one ordered, platform-gated unit of pipeline work. Stages
//! execute in a fixed total order; only a platform mismatch or an explicit
//! skip condition skips one, never a previous stage's success.

use async_trait::async_trait;

use crate::errors::BundleflowError;
use crate::pipeline::BuildContext;
use crate::platform::PlatformSet;

/// A fallible unit of pipeline work.
#[async_trait]
pub trait StageAction: Send + Sync {
    async fn run(&self, ctx: &mut BuildContext) -> Result<(), BundleflowError>;
}

/// Condition for running a stage, evaluated before its platform gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StageCondition {
    #[default]
    Always,
    /// Skip unconditionally, regardless of platform (e.g. `--skip-deps`).
    Never,
}

/// One ordered, platform-gated unit of pipeline work
pub struct Stage {
    /// Stage name, used in diagnostics and listings
    pub name: &'static str,

    /// One-line summary for listings
    pub summary: &'static str,

    /// Platforms this stage applies to
    pub platforms: PlatformSet,

    /// Whether this stage runs at all
    pub condition: StageCondition,

    action: Box<dyn StageAction>,
}

impl Stage {
    pub fn new(
        name: &'static str,
        summary: &'static str,
        platforms: PlatformSet,
        action: impl StageAction + 'static,
    ) -> Self {
        Self {
            name,
            summary,
            platforms,
            condition: StageCondition::Always,
            action: Box::new(action),
        }
    }

    pub fn with_condition(mut self, condition: StageCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Execute this stage's action.
    pub async fn run(&self, ctx: &mut BuildContext) -> Result<(), BundleflowError> {
        self.action.run(ctx).await
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("platforms", &self.platforms)
            .field("condition", &self.condition)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BundleConfig;
    use crate::platform::Platform;

    struct Noop;

    #[async_trait]
    impl StageAction for Noop {
        async fn run(&self, _ctx: &mut BuildContext) -> Result<(), BundleflowError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_stage_runs_action() {
        let stage = Stage::new("noop", "does nothing", PlatformSet::Any, Noop);
        let config = BundleConfig::from_toml(r#"name = "App""#).unwrap();
        let mut ctx =
            BuildContext::for_platform(config, std::env::temp_dir(), Platform::LinuxOrOther);

        assert!(stage.run(&mut ctx).await.is_ok());
        assert_eq!(stage.condition, StageCondition::Always);
    }

    #[test]
    fn test_with_condition() {
        let stage = Stage::new("noop", "does nothing", PlatformSet::Any, Noop)
            .with_condition(StageCondition::Never);
        assert_eq!(stage.condition, StageCondition::Never);
    }
}
