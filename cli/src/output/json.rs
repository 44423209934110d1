//! JSON output helpers for `--json` mode.

use std::path::Path;

use anyhow::{Context, Result};
use mits_common::{Backend, SuiteConfig};
use serde::Serialize;

use crate::application::services::scenario::ScenarioReport;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// One scenario line of the `mits run --json` summary.
#[derive(Debug, Serialize)]
pub struct ScenarioSummary<'a> {
    pub backend: Backend,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound_app: Option<&'a str>,
    #[serde(skip_serializing_if = "no_fields")]
    pub credential_fields: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> ScenarioSummary<'a> {
    #[must_use]
    pub fn new(backend: Backend, result: &'a Result<ScenarioReport>) -> Self {
        match result {
            Ok(report) => Self {
                backend,
                passed: true,
                instance: Some(&report.instance),
                bound_app: report.bound_app.as_deref(),
                credential_fields: &report.credential_fields,
                error: None,
            },
            Err(e) => Self {
                backend,
                passed: false,
                instance: None,
                bound_app: None,
                credential_fields: &[],
                error: Some(format!("{e:#}")),
            },
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde passes fields by reference
fn no_fields(fields: &&[String]) -> bool {
    fields.is_empty()
}

/// Format the run summary as `{"scenarios": [...], "skipped": [...]}`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_run_summary(scenarios: &[ScenarioSummary<'_>], skipped: &[Backend]) -> Result<String> {
    let obj = serde_json::json!({
        "scenarios": scenarios,
        "skipped": skipped,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Renders run results and configuration as JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// Print the run summary.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_run_summary(
        &self,
        results: &[(Backend, Result<ScenarioReport>)],
        skipped: &[Backend],
    ) -> Result<()> {
        let summaries: Vec<ScenarioSummary<'_>> = results
            .iter()
            .map(|(backend, result)| ScenarioSummary::new(*backend, result))
            .collect();
        println!("{}", format_run_summary(&summaries, skipped)?);
        Ok(())
    }

    /// Print `{"path": ..., "config": ...}`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &SuiteConfig, path: &Path) -> Result<()> {
        let obj = serde_json::json!({
            "path": path.display().to_string(),
            "config": config,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&obj).context("JSON serialization failed")?
        );
        Ok(())
    }
}
