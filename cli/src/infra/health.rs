//! Infrastructure implementation of the `HealthProbe` port.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::ports::HealthProbe;

/// Probes health endpoints with a blocking `ureq` request on tokio's
/// blocking pool.
#[derive(Debug, Clone, Default)]
pub struct HttpHealthProbe;

impl HealthProbe for HttpHealthProbe {
    async fn check(&self, url: &str, timeout: Duration) -> Result<bool> {
        let target = url.to_string();
        tokio::task::spawn_blocking(move || probe(&target, timeout))
            .await
            .with_context(|| format!("health probe for {url} panicked"))
    }
}

fn probe(url: &str, timeout: Duration) -> bool {
    let agent = ureq::AgentBuilder::new().timeout(timeout).build();
    match agent.get(url).set("User-Agent", "mits-cli").call() {
        Ok(resp) => {
            let healthy = (200..300).contains(&resp.status());
            debug!(url = %url, status = resp.status(), "health endpoint answered");
            healthy
        }
        Err(ureq::Error::Status(code, _)) => {
            debug!(url = %url, status = code, "health endpoint not healthy yet");
            false
        }
        Err(e) => {
            debug!(url = %url, error = %e, "health endpoint unreachable");
            false
        }
    }
}
