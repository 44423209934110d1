//! `mits config`: validate and show the effective configuration.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or rendered.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.config_store.load()?;
    app.renderer()
        .render_config(&config, app.config_store.path())?;
    Ok(ExitCode::SUCCESS)
}
