//! Scenario runner: provisions one backend's service instance, exercises it
//! end to end and always tears it down again.
//!
//! Imports only from `crate::domain`, `crate::application` and `mits_common`.

use anyhow::{Context, Result};
use mits_common::{Backend, TestConfig, TimeoutsConfig};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::application::ports::{HealthProbe, PlatformGateway, ProgressReporter};
use crate::domain::{prefixed_random_name, provisioning_parameters};

use super::instance::{ServiceInstance, ServiceOffering};
use super::poller::POLL_BACKOFF;

/// Everything one scenario needs from the suite configuration.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioSpec<'a> {
    pub backend: Backend,
    pub test: &'a TestConfig,
    pub broker: &'a str,
    /// The broker overrides provisioning parameters itself.
    pub override_params: bool,
    pub timeouts: &'a TimeoutsConfig,
}

/// What a passing scenario observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    pub backend: Backend,
    pub instance: String,
    /// Credential field names, sorted. Values are never reported.
    pub credential_fields: Vec<String>,
    pub bound_app: Option<String>,
}

/// Run one backend scenario against the platform.
///
/// Forward steps: create, wait for create, bind the configured app, read
/// credentials, wait for the app to report healthy, unbind. The instance is
/// destroyed afterwards whatever the forward steps returned.
///
/// # Errors
///
/// Returns the first forward step's error. Teardown failures are only logged.
pub async fn run_scenario(
    gateway: &impl PlatformGateway,
    probe: &impl HealthProbe,
    reporter: &impl ProgressReporter,
    spec: &ScenarioSpec<'_>,
) -> Result<ScenarioReport> {
    let name = prefixed_random_name(&spec.test.class, "service");
    let mut instance = ServiceInstance::new(gateway, name, spec.broker);

    let outcome = drive(&mut instance, probe, reporter, spec).await;

    reporter.step(&format!("{}: destroying {}", spec.backend, instance.name()));
    instance.destroy(spec.timeouts.command).await;
    outcome
}

async fn drive<G: PlatformGateway>(
    instance: &mut ServiceInstance<'_, G>,
    probe: &impl HealthProbe,
    reporter: &impl ProgressReporter,
    spec: &ScenarioSpec<'_>,
) -> Result<ScenarioReport> {
    let backend = spec.backend;
    let timeouts = spec.timeouts;
    let offering = ServiceOffering {
        class: &spec.test.class,
        plan: &spec.test.plan,
    };
    let params = provisioning_parameters(backend, &spec.test.class, spec.override_params);

    reporter.step(&format!(
        "{backend}: creating {} ({} {})",
        instance.name(),
        offering.class,
        offering.plan
    ));
    instance
        .create(offering, params.as_ref(), timeouts.command)
        .await?;

    reporter.step(&format!("{backend}: waiting for {} to become ready", instance.name()));
    instance.wait_for_create(timeouts.create_service).await?;

    let app = spec.test.app.as_ref();
    if let Some(app) = app {
        reporter.step(&format!("{backend}: binding {} to {}", instance.name(), app.name));
        instance.bind(&app.name, timeouts.command).await?;
    }

    reporter.step(&format!("{backend}: reading credentials"));
    let mut credential_fields: Vec<String> =
        instance.credentials(timeouts.command).await?.keys().cloned().collect();
    credential_fields.sort();
    debug!(instance = %instance.name(), fields = ?credential_fields, "credentials resolved");

    if let Some(app) = app {
        reporter.step(&format!("{backend}: waiting for {} to report healthy", app.name));
        wait_healthy(probe, &app.url, timeouts.health)
            .await
            .with_context(|| format!("app {} bound to {}", app.name, instance.name()))?;
        instance.unbind(&app.name, timeouts.command).await?;
    }

    info!(backend = %backend, instance = %instance.name(), "scenario passed");
    Ok(ScenarioReport {
        backend,
        instance: instance.name().to_string(),
        credential_fields,
        bound_app: app.map(|a| a.name.clone()),
    })
}

/// Probe `url` every [`POLL_BACKOFF`] until it answers 2xx or `timeout` passes.
async fn wait_healthy(
    probe: &impl HealthProbe,
    url: &str,
    timeout: std::time::Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        let now = Instant::now();
        if now >= deadline {
            anyhow::bail!("health endpoint {url} did not answer 2xx within {timeout:?}");
        }
        if probe
            .check(url, deadline - now)
            .await
            .with_context(|| format!("probing {url}"))?
        {
            debug!(url = %url, "health endpoint answered");
            return Ok(());
        }
        tokio::time::sleep(POLL_BACKOFF).await;
    }
}
