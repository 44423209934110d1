//! Status poller: turns the asynchronous, text-reported provisioning status
//! of a service instance into a wait-until-condition primitive.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::application::ports::ServiceInspector;
use crate::domain::{ProvisioningCondition, ServiceError, StatusClass, extract_status};

use super::{failure_reason, run_error_reason};

/// Pause between two status queries while the operation is in progress.
pub const POLL_BACKOFF: Duration = Duration::from_secs(1);

/// Wait until `name` reports the condition's completed status.
///
/// Polls `cf service <name>` every [`POLL_BACKOFF`] while the status is the
/// progress token or not reported yet. Returns within `timeout` plus at most
/// one backoff and one query.
///
/// # Errors
///
/// - [`ServiceError::QueryFailed`] as soon as a status query fails; a broken
///   query path is not retried.
/// - [`ServiceError::UnexpectedStatus`] as soon as a token other than the
///   progress or completed one is observed.
/// - [`ServiceError::Timeout`] when the deadline passes first.
pub async fn wait_for(
    inspector: &impl ServiceInspector,
    name: &str,
    condition: &ProvisioningCondition,
    timeout: Duration,
) -> Result<(), ServiceError> {
    let deadline = Instant::now() + timeout;
    let mut last_status = None;
    loop {
        let now = Instant::now();
        if now >= deadline {
            return Err(ServiceError::Timeout {
                instance: name.to_string(),
                timeout,
                last_status,
            });
        }

        let output = inspector
            .service_info(name, deadline - now)
            .await
            .map_err(|e| ServiceError::QueryFailed {
                instance: name.to_string(),
                reason: run_error_reason("cf service", &e),
            })?;
        if !output.status.success() {
            return Err(ServiceError::QueryFailed {
                instance: name.to_string(),
                reason: failure_reason("cf service", &output),
            });
        }

        let status = extract_status(&String::from_utf8_lossy(&output.stdout));
        debug!(instance = %name, status = ?status, "polled service status");
        match condition.classify(status.as_deref()) {
            StatusClass::Completed => return Ok(()),
            StatusClass::Unexpected(status) => {
                return Err(ServiceError::UnexpectedStatus {
                    instance: name.to_string(),
                    status,
                });
            }
            StatusClass::Pending => {
                last_status = status;
                tokio::time::sleep(POLL_BACKOFF).await;
            }
        }
    }
}
