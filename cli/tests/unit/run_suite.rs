//! Unit tests for the `mits run` suite driver.

#![allow(clippy::expect_used)]

use mits_cli::commands::run::{SuiteOutcome, run_suite};
use mits_cli::output::{JsonRenderer, Renderer};
use mits_common::{Backend, SuiteConfig};

use crate::mocks::{FakePlatform, FixedProbe, RecordingReporter};

fn suite_config() -> SuiteConfig {
    serde_yaml::from_str(
        r"
broker:
  name: minibroker
tests:
  redis:
    enabled: true
    class: redis
    plan: 5-0-7
    app:
      name: redisapp
      url: http://redisapp.example.com/health
  mysql:
    enabled: true
    class: mysql
    plan: 5-7-30
  mongodb:
    enabled: false
    class: mongodb
    plan: 4-0-3
",
    )
    .expect("valid config")
}

#[tokio::test(start_paused = true)]
async fn test_suite_counts_passed_failed_and_skipped() {
    let platform = FakePlatform::new().with_pending_polls(1).failing_class("mysql");
    let reporter = RecordingReporter::default();

    let outcome = run_suite(
        &suite_config(),
        &[],
        &platform,
        &FixedProbe(true),
        &reporter,
        &Renderer::Json(JsonRenderer),
    )
    .await
    .expect("suite runs");

    assert_eq!(
        outcome,
        SuiteOutcome {
            passed: 1,
            failed: 1,
            skipped: 4,
        }
    );
    assert!(platform.live_instances().is_empty());
    assert!(
        reporter
            .messages()
            .contains(&"warn: mongodb: test disabled, skipping".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_requested_backend_runs_alone() {
    let platform = FakePlatform::new();

    let outcome = run_suite(
        &suite_config(),
        &[Backend::Redis],
        &platform,
        &FixedProbe(true),
        &RecordingReporter::default(),
        &Renderer::Json(JsonRenderer),
    )
    .await
    .expect("suite runs");

    assert_eq!(outcome.passed, 1);
    assert_eq!(outcome.failed, 0);
    assert_eq!(outcome.skipped, 0);
    assert!(
        platform
            .calls()
            .iter()
            .filter(|c| c.starts_with("create-service "))
            .all(|c| c.contains("redis-service-"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_disabled_request_runs_nothing() {
    let platform = FakePlatform::new();

    let outcome = run_suite(
        &suite_config(),
        &[Backend::MongoDb],
        &platform,
        &FixedProbe(true),
        &RecordingReporter::default(),
        &Renderer::Json(JsonRenderer),
    )
    .await
    .expect("suite runs");

    assert_eq!(outcome.passed + outcome.failed, 0);
    assert_eq!(outcome.skipped, 1);
    assert!(platform.calls().is_empty());
}
