//! Application context — unified state passed to every command handler.
//!
//! `AppContext` bundles the output context with the infrastructure adapters
//! (config store, `cf` gateway, health probe) so command handlers take one
//! parameter instead of many.

use std::path::PathBuf;

use crate::infra::cf::CfCli;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::health::HttpHealthProbe;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Explicit configuration file (`--config` or `MITS_CONFIG`).
    pub config: Option<PathBuf>,
}

/// Unified application context passed to every command handler.
///
/// Constructed once in `Cli::run()` and passed as `&AppContext`.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Suite configuration source.
    pub config_store: YamlConfigStore,
    /// Platform gateway backed by the `cf` CLI.
    pub gateway: CfCli<TokioCommandRunner>,
    /// Health probe for bound test apps.
    pub probe: HttpHealthProbe,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        let config_store = flags
            .config
            .as_ref()
            .map_or_else(YamlConfigStore::default, YamlConfigStore::new);

        // JSON owns stdout; human output is silenced, errors still reach stderr.
        let json = flags.output.json;
        Self {
            output: OutputContext::new(flags.output.no_color || json, flags.output.quiet || json),
            mode,
            config_store,
            gateway: CfCli::default_runner(),
            probe: HttpHealthProbe,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }
}
