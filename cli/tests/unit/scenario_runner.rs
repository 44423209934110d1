//! Unit tests for `run_scenario` against the in-memory platform.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use mits_cli::application::services::scenario::{ScenarioSpec, run_scenario};
use mits_cli::domain::ServiceError;
use mits_common::{AppTarget, Backend, TestConfig, TimeoutsConfig};

use crate::mocks::{FakePlatform, FixedProbe, RecordingReporter};

fn test_config(class: &str, plan: &str, app: Option<&str>) -> TestConfig {
    TestConfig {
        enabled: true,
        class: class.into(),
        plan: plan.into(),
        app: app.map(|name| AppTarget {
            name: name.into(),
            url: format!("http://{name}.apps.example.com/health"),
        }),
    }
}

fn spec<'a>(
    backend: Backend,
    test: &'a TestConfig,
    timeouts: &'a TimeoutsConfig,
    override_params: bool,
) -> ScenarioSpec<'a> {
    ScenarioSpec {
        backend,
        test,
        broker: "minibroker",
        override_params,
        timeouts,
    }
}

#[tokio::test(start_paused = true)]
async fn test_scenario_passes_and_tears_down() {
    let platform = FakePlatform::new().with_pending_polls(3);
    let reporter = RecordingReporter::default();
    let test = test_config("redis", "5-0-7", Some("redisapp"));
    let timeouts = TimeoutsConfig::default();

    let report = run_scenario(
        &platform,
        &FixedProbe(true),
        &reporter,
        &spec(Backend::Redis, &test, &timeouts, false),
    )
    .await
    .expect("scenario passes");

    assert_eq!(report.credential_fields, ["host", "port", "uri"]);
    assert_eq!(report.bound_app.as_deref(), Some("redisapp"));
    assert!(platform.live_instances().is_empty());
    assert_eq!(platform.live_keys(), 0);

    let messages = reporter.messages();
    assert!(messages.iter().all(|m| m.contains("redis:")), "{messages:?}");
    assert!(
        messages.last().expect("messages").contains("destroying"),
        "{messages:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn test_overridden_backends_send_no_parameters() {
    let platform = FakePlatform::new();
    let test = test_config("postgresql", "11-0-0", None);
    let timeouts = TimeoutsConfig::default();

    run_scenario(
        &platform,
        &FixedProbe(true),
        &RecordingReporter::default(),
        &spec(Backend::PostgreSql, &test, &timeouts, true),
    )
    .await
    .expect("scenario passes");

    let created = platform
        .calls()
        .into_iter()
        .find(|c| c.starts_with("create-service "))
        .expect("create call");
    let name = created.trim_start_matches("create-service ");
    assert!(name.starts_with("postgresql-service-"), "{name}");
    assert!(platform.parameters_of(name).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_unhealthy_app_fails_and_unbinds() {
    let platform = FakePlatform::new();
    let test = test_config("mongodb", "4-0-3", Some("mongoapp"));
    let timeouts = TimeoutsConfig {
        health: Duration::from_secs(10),
        ..TimeoutsConfig::default()
    };

    let err = run_scenario(
        &platform,
        &FixedProbe(false),
        &RecordingReporter::default(),
        &spec(Backend::MongoDb, &test, &timeouts, false),
    )
    .await
    .expect_err("health check fails");

    assert!(format!("{err:#}").contains("did not answer 2xx"), "{err:#}");
    assert!(platform.calls().iter().any(|c| c.starts_with("unbind-service")));
    assert!(platform.live_instances().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_broker_rejection_surfaces_service_error() {
    let platform = FakePlatform::new().failing_class("rabbitmq");
    let test = test_config("rabbitmq", "6-2-0", None);
    let timeouts = TimeoutsConfig::default();

    let err = run_scenario(
        &platform,
        &FixedProbe(true),
        &RecordingReporter::default(),
        &spec(Backend::RabbitMq, &test, &timeouts, false),
    )
    .await
    .expect_err("create is rejected");

    let service_err = err.downcast_ref::<ServiceError>().expect("service error");
    assert!(matches!(service_err, ServiceError::CreateFailed { .. }));
    assert!(format!("{err:#}").contains("plan 6-2-0 unavailable"), "{err:#}");
}
