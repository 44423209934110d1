//! `mits run`: provision, exercise and tear down one service instance per
//! enabled backend, all backends concurrently.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use futures_util::future::join_all;
use mits_common::{Backend, SuiteConfig, TestConfig, TestsConfig};

use crate::app::AppContext;
use crate::application::ports::{ConfigStore, HealthProbe, PlatformGateway, ProgressReporter};
use crate::application::services::scenario::{ScenarioReport, ScenarioSpec, run_scenario};
use crate::output::{Renderer, TerminalReporter};

/// Arguments for the run command.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Run only this backend (repeatable). Defaults to every enabled backend
    #[arg(long = "backend", value_enum, value_name = "BACKEND")]
    pub backends: Vec<Backend>,
}

/// Backends to run and backends skipped because their test is disabled.
#[derive(Debug)]
pub struct Selection<'a> {
    pub scenarios: Vec<(Backend, &'a TestConfig)>,
    pub skipped: Vec<Backend>,
}

/// Pick the scenarios to run, in [`Backend::ALL`] order.
///
/// An empty `requested` list considers every backend. Backends that are
/// disabled or missing from the configuration are skipped.
#[must_use]
pub fn select<'a>(tests: &'a TestsConfig, requested: &[Backend]) -> Selection<'a> {
    let mut selection = Selection {
        scenarios: Vec::new(),
        skipped: Vec::new(),
    };
    for backend in Backend::ALL {
        if !requested.is_empty() && !requested.contains(&backend) {
            continue;
        }
        match tests.get(backend) {
            Some(test) if test.enabled => selection.scenarios.push((backend, test)),
            _ => selection.skipped.push(backend),
        }
    }
    selection
}

/// Counts of one suite run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuiteOutcome {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SuiteOutcome {
    #[must_use]
    pub fn exit_code(self) -> ExitCode {
        if self.failed == 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Entry point for `mits run`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the summary
/// cannot be rendered.
pub async fn run(app: &AppContext, args: &RunArgs) -> Result<ExitCode> {
    let config = app.config_store.load()?;
    let reporter = TerminalReporter::new(&app.output);
    let outcome = run_suite(
        &config,
        &args.backends,
        &app.gateway,
        &app.probe,
        &reporter,
        &app.renderer(),
    )
    .await?;
    Ok(outcome.exit_code())
}

/// Run the selected scenarios concurrently and render every result.
///
/// Each scenario owns its service instance; scenarios share only the
/// gateway, the probe and the progress reporter.
///
/// # Errors
///
/// Returns an error if the summary cannot be rendered.
pub async fn run_suite(
    config: &SuiteConfig,
    requested: &[Backend],
    gateway: &impl PlatformGateway,
    probe: &impl HealthProbe,
    reporter: &impl ProgressReporter,
    renderer: &Renderer<'_>,
) -> Result<SuiteOutcome> {
    let selection = select(&config.tests, requested);
    for backend in &selection.skipped {
        reporter.warn(&format!("{backend}: test disabled, skipping"));
    }
    reporter.step(&format!(
        "running {} scenarios against broker {}",
        selection.scenarios.len(),
        config.broker.name
    ));

    let runs = selection.scenarios.iter().map(|&(backend, test)| {
        let spec = ScenarioSpec {
            backend,
            test,
            broker: &config.broker.name,
            override_params: config.provisioning.override_params.enabled,
            timeouts: &config.timeouts,
        };
        async move { (backend, run_scenario(gateway, probe, reporter, &spec).await) }
    });
    let results: Vec<(Backend, Result<ScenarioReport>)> = join_all(runs).await;

    renderer.render_run_summary(&results, &selection.skipped)?;
    Ok(SuiteOutcome {
        passed: results.iter().filter(|(_, r)| r.is_ok()).count(),
        failed: results.iter().filter(|(_, r)| r.is_err()).count(),
        skipped: selection.skipped.len(),
    })
}
