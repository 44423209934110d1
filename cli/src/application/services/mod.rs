//! Application services — use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

use std::process::Output;

pub mod credentials;
pub mod instance;
pub mod poller;
pub mod scenario;


/// Human-readable reason for a command that exited unsuccessfully.
pub(crate) fn failure_reason(command: &str, output: &Output) -> String {
    let exit = match output.status.code() {
        Some(code) => format!("exited with code {code}"),
        None => "was terminated by a signal".to_string(),
    };
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("{command} {exit}")
    } else {
        format!("{command} {exit}: {stderr}")
    }
}

/// Reason for a command that could not be run at all.
pub(crate) fn run_error_reason(command: &str, error: &anyhow::Error) -> String {
    format!("{command}: {error:#}")
}

/// First line of stdout, trimmed. Empty when nothing was printed.
pub(crate) fn stdout_line(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}
