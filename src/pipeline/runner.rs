// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 bundleflow contributors

//! Pipeline runner
//!
//! Executes the fixed stage list in order: skip inapplicable stages, stop
//! on first failure with the originating exit code, and restore mutated
//! environment variables on every exit path. There is no rollback; side
//! effects accumulate and a rerun re-invokes the whole pipeline.

use colored::Colorize;
use std::time::{Duration, Instant};

use crate::errors::BundleflowError;
use crate::pipeline::{BuildContext, Stage, StageCondition};
use crate::utils::progress::StageTracker;

/// Lifecycle of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    /// Executing the stage at this index
    Running(usize),
    /// Terminal: the stage at this index failed with this exit code
    Failed { index: usize, code: i32 },
    /// Terminal: every stage completed or was skipped
    Completed,
}

/// Summary of a completed run
#[derive(Debug, Default)]
pub struct RunReport {
    pub executed: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
    pub duration: Duration,
}

/// Sequences stages, fail-fast, single exit path
pub struct PipelineRunner {
    state: RunState,
}

impl PipelineRunner {
    pub fn new() -> Self {
        Self {
            state: RunState::NotStarted,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute stages in order.
    ///
    /// The environment guard in `ctx` is restored on entry to both terminal
    /// states, and an OS interrupt is folded into the failure path so the
    /// restore still happens.
    pub async fn run(
        &mut self,
        stages: &[Stage],
        ctx: &mut BuildContext,
    ) -> Result<RunReport, BundleflowError> {
        let start = Instant::now();
        let mut report = RunReport::default();
        let mut tracker = StageTracker::new(stages.len());

        for (index, stage) in stages.iter().enumerate() {
            self.state = RunState::Running(index);

            if stage.condition == StageCondition::Never {
                tracing::debug!("skipping stage '{}': disabled for this run", stage.name);
                tracker.skip(stage.name, "disabled");
                report.skipped.push(stage.name);
                continue;
            }

            if !stage.platforms.contains(ctx.platform) {
                tracing::debug!(
                    "skipping stage '{}': applies to {}, current platform is {}",
                    stage.name,
                    stage.platforms,
                    ctx.platform
                );
                tracker.skip(stage.name, "platform");
                report.skipped.push(stage.name);
                continue;
            }

            tracker.start(stage.name);
            let stage_start = Instant::now();

            // An interrupt mid-stage must still reach the restore below.
            let result = tokio::select! {
                result = stage.run(ctx) => result,
                _ = tokio::signal::ctrl_c() => Err(BundleflowError::Interrupted),
            };

            match result {
                Ok(()) => {
                    tracker.complete(stage.name, stage_start.elapsed());
                    report.executed.push(stage.name);
                }
                Err(source) => {
                    tracker.fail(stage.name);

                    let code = source.exit_code();
                    self.state = RunState::Failed { index, code };
                    ctx.env.restore();

                    tracing::error!(
                        "stage '{}' (step {} of {}) failed with exit code {}: {}",
                        stage.name,
                        index + 1,
                        stages.len(),
                        code,
                        source
                    );

                    return Err(BundleflowError::StageFailed {
                        stage: stage.name.to_string(),
                        step: index + 1,
                        code,
                        source: Box::new(source),
                    });
                }
            }
        }

        self.state = RunState::Completed;
        ctx.env.restore();
        report.duration = start.elapsed();

        println!();
        println!(
            "{}",
            format!(
                "Pipeline completed successfully in {:.2}s",
                report.duration.as_secs_f64()
            )
            .green()
        );
        tracing::info!(
            "{} stage(s) executed, {} skipped",
            report.executed.len(),
            report.skipped.len()
        );

        Ok(report)
    }
}

impl Default for PipelineRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BundleConfig;
    use crate::pipeline::StageAction;
    use crate::platform::{Platform, PlatformSet};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Spy action that records its execution and optionally fails.
    struct Recording {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        fail_code: Option<i32>,
    }

    #[async_trait]
    impl StageAction for Recording {
        async fn run(&self, _ctx: &mut BuildContext) -> Result<(), BundleflowError> {
            self.log.lock().unwrap().push(self.name);
            match self.fail_code {
                Some(code) => Err(BundleflowError::ToolExecutionFailed {
                    tool: self.name.into(),
                    code,
                    stderr: String::new(),
                    help: None,
                }),
                None => Ok(()),
            }
        }
    }

    fn stage(
        name: &'static str,
        platforms: PlatformSet,
        log: &Arc<Mutex<Vec<&'static str>>>,
        fail_code: Option<i32>,
    ) -> Stage {
        Stage::new(
            name,
            "test stage",
            platforms,
            Recording {
                name,
                log: Arc::clone(log),
                fail_code,
            },
        )
    }

    fn context(platform: Platform) -> BuildContext {
        let config = BundleConfig::from_toml(r#"name = "App""#).unwrap();
        BuildContext::for_platform(config, std::env::temp_dir(), platform)
    }

    #[tokio::test]
    async fn test_all_stages_run_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let stages = vec![
            stage("a", PlatformSet::Any, &log, None),
            stage("b", PlatformSet::Any, &log, None),
            stage("c", PlatformSet::Any, &log, None),
        ];

        let mut runner = PipelineRunner::new();
        let mut ctx = context(Platform::LinuxOrOther);
        let report = runner.run(&stages, &mut ctx).await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(report.executed, vec!["a", "b", "c"]);
        assert!(report.skipped.is_empty());
        assert_eq!(runner.state(), RunState::Completed);
    }

    #[tokio::test]
    async fn test_platform_mismatch_skips_action() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let stages = vec![
            stage("windows-only", PlatformSet::WINDOWS, &log, None),
            stage("everywhere", PlatformSet::Any, &log, None),
        ];

        let mut runner = PipelineRunner::new();
        let mut ctx = context(Platform::LinuxOrOther);
        let report = runner.run(&stages, &mut ctx).await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["everywhere"]);
        assert_eq!(report.skipped, vec!["windows-only"]);
    }

    #[tokio::test]
    async fn test_failure_stops_pipeline_with_stage_code() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let stages = vec![
            stage("one", PlatformSet::Any, &log, None),
            stage("two", PlatformSet::Any, &log, Some(42)),
            stage("three", PlatformSet::Any, &log, None),
        ];

        let mut runner = PipelineRunner::new();
        let mut ctx = context(Platform::LinuxOrOther);
        let err = runner.run(&stages, &mut ctx).await.unwrap_err();

        // Stages 1..k ran, k+1..N did not.
        assert_eq!(*log.lock().unwrap(), vec!["one", "two"]);
        assert_eq!(err.exit_code(), 42);
        match err {
            BundleflowError::StageFailed { stage, step, .. } => {
                assert_eq!(stage, "two");
                assert_eq!(step, 2);
            }
            other => panic!("expected StageFailed, got {:?}", other),
        }
        assert_eq!(
            runner.state(),
            RunState::Failed { index: 1, code: 42 }
        );
    }

    #[tokio::test]
    async fn test_disabled_stage_skips_on_every_platform() {
        let log = Arc::new(Mutex::new(Vec::new()));
        // The disabled stage must be skipped even where its platform
        // matches, and later stages still run.
        let stages = vec![
            stage("install-deps", PlatformSet::Any, &log, None)
                .with_condition(StageCondition::Never),
            stage("after", PlatformSet::Any, &log, None),
        ];

        let mut runner = PipelineRunner::new();
        let mut ctx = context(Platform::LinuxOrOther);
        let report = runner.run(&stages, &mut ctx).await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["after"]);
        assert_eq!(report.skipped, vec!["install-deps"]);
        assert_eq!(report.executed, vec!["after"]);
    }

    /// Action that mutates the environment through the guard.
    struct Mutating {
        var: &'static str,
    }

    #[async_trait]
    impl StageAction for Mutating {
        async fn run(&self, ctx: &mut BuildContext) -> Result<(), BundleflowError> {
            ctx.env.set(self.var, "mutated");
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_environment_restored_after_success() {
        std::env::set_var("BUNDLEFLOW_TEST_RUNNER_OK", "original");

        let stages = vec![Stage::new(
            "mutate",
            "mutates env",
            PlatformSet::Any,
            Mutating {
                var: "BUNDLEFLOW_TEST_RUNNER_OK",
            },
        )];

        let mut runner = PipelineRunner::new();
        let mut ctx = context(Platform::LinuxOrOther);
        runner.run(&stages, &mut ctx).await.unwrap();

        assert_eq!(
            std::env::var("BUNDLEFLOW_TEST_RUNNER_OK").unwrap(),
            "original"
        );
        std::env::remove_var("BUNDLEFLOW_TEST_RUNNER_OK");
    }

    #[tokio::test]
    async fn test_environment_restored_after_failure() {
        std::env::remove_var("BUNDLEFLOW_TEST_RUNNER_FAIL");

        let log = Arc::new(Mutex::new(Vec::new()));
        let stages = vec![
            Stage::new(
                "mutate",
                "mutates env",
                PlatformSet::Any,
                Mutating {
                    var: "BUNDLEFLOW_TEST_RUNNER_FAIL",
                },
            ),
            stage("boom", PlatformSet::Any, &log, Some(2)),
        ];

        let mut runner = PipelineRunner::new();
        let mut ctx = context(Platform::LinuxOrOther);
        assert!(runner.run(&stages, &mut ctx).await.is_err());

        assert!(std::env::var("BUNDLEFLOW_TEST_RUNNER_FAIL").is_err());
    }
}
