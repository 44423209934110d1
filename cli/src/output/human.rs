//! Human-readable terminal renderer.

use std::path::Path;

use anyhow::{Context, Result};
use mits_common::{Backend, SuiteConfig};

use crate::application::services::scenario::ScenarioReport;
use crate::output::OutputContext;

/// Renders run results and configuration as human-readable terminal output.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render one line per scenario, the skipped backends, then the totals.
    pub fn render_run_summary(
        &self,
        results: &[(Backend, Result<ScenarioReport>)],
        skipped: &[Backend],
    ) {
        println!();
        for (backend, result) in results {
            match result {
                Ok(report) => {
                    self.ctx.success(&format!("{backend}: passed ({})", report.instance));
                    if !report.credential_fields.is_empty() {
                        self.ctx
                            .kv("    credentials:", &report.credential_fields.join(", "));
                    }
                }
                Err(e) => self.ctx.error(&format!("{backend}: {e:#}")),
            }
        }

        if let Some(line) = skipped_line(skipped) {
            self.ctx.warn(&line);
        }

        let failed = results.iter().filter(|(_, r)| r.is_err()).count();
        if results.is_empty() {
            self.ctx.warn("no enabled tests selected; nothing to run");
        } else if failed > 0 {
            self.ctx
                .error(&format!("{failed} of {} scenarios failed", results.len()));
        } else {
            self.ctx.info(&format!("{} scenarios passed", results.len()));
        }
    }

    /// Render the effective configuration: a short digest, then the YAML.
    ///
    /// The YAML is printed even when quiet; it is the command's output.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized.
    pub fn render_config(&self, config: &SuiteConfig, path: &Path) -> Result<()> {
        self.ctx
            .header(&format!("Configuration ({})", path.display()));
        self.ctx.kv("broker:", &config.broker.name);
        let enabled: Vec<&str> = config
            .tests
            .enabled()
            .into_iter()
            .map(Backend::as_str)
            .collect();
        self.ctx.kv(
            "enabled:",
            &if enabled.is_empty() {
                "(none)".to_string()
            } else {
                enabled.join(", ")
            },
        );
        if !self.ctx.quiet {
            println!();
        }
        print!("{}", render_yaml(config)?);
        Ok(())
    }
}

/// `skipped: mysql, mongodb`, or `None` when nothing was skipped.
#[must_use]
pub fn skipped_line(skipped: &[Backend]) -> Option<String> {
    if skipped.is_empty() {
        return None;
    }
    let names: Vec<&str> = skipped.iter().copied().map(Backend::as_str).collect();
    Some(format!("skipped: {}", names.join(", ")))
}

/// Effective configuration, defaults filled in, as YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_yaml(config: &SuiteConfig) -> Result<String> {
    serde_yaml::to_string(config).context("cannot serialize configuration")
}
