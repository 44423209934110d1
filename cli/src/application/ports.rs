//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `mits_common`, never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use mits_common::SuiteConfig;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Arguments of `cf create-service`.
pub struct CreateServiceRequest<'a> {
    /// Broker offering the service class (`-b`).
    pub broker: &'a str,
    /// Service class, e.g. `redis`.
    pub class: &'a str,
    /// Plan of the class, e.g. `5-0-7`.
    pub plan: &'a str,
    /// Instance name.
    pub name: &'a str,
    /// Encoded parameters for `-c`. `None` omits the flag.
    pub parameters: Option<&'a str>,
}

// ── Platform Port Traits ──────────────────────────────────────────────────────
//
// Every method returns the raw command `Output`; an `Err` means the command
// could not be run at all (spawn failure, timeout). Interpreting exit codes
// is the caller's job.

/// Service instance creation and deletion.
#[allow(async_fn_in_trait)]
pub trait ServiceLifecycle {
    /// `cf create-service -b <broker> <class> <plan> <name> [-c <params>]`.
    async fn create_service(
        &self,
        request: &CreateServiceRequest<'_>,
        timeout: Duration,
    ) -> Result<Output>;
    /// `cf delete-service <name> -f`.
    async fn delete_service(&self, name: &str, timeout: Duration) -> Result<Output>;
}

/// Read-only service instance queries.
#[allow(async_fn_in_trait)]
pub trait ServiceInspector {
    /// `cf service --guid <name>`: prints the instance guid.
    async fn service_guid(&self, name: &str, timeout: Duration) -> Result<Output>;
    /// `cf service <name>`: prints the instance details, including `status:`.
    async fn service_info(&self, name: &str, timeout: Duration) -> Result<Output>;
}

/// Service key management used to read credentials.
#[allow(async_fn_in_trait)]
pub trait ServiceKeys {
    /// `cf create-service-key <instance> <key>`.
    async fn create_service_key(&self, instance: &str, key: &str, timeout: Duration)
    -> Result<Output>;
    /// `cf service-key --guid <instance> <key>`: prints the key guid.
    async fn service_key_guid(&self, instance: &str, key: &str, timeout: Duration)
    -> Result<Output>;
    /// `cf curl --fail /v2/service_keys/<guid>`: prints the key record.
    ///
    /// Exits 22 on HTTP errors; other non-zero codes are not failures.
    async fn fetch_service_key(&self, guid: &str, timeout: Duration) -> Result<Output>;
    /// `cf delete-service-key <instance> <key> -f`.
    async fn delete_service_key(&self, instance: &str, key: &str, timeout: Duration)
    -> Result<Output>;
}

/// Binding instances to applications.
#[allow(async_fn_in_trait)]
pub trait ServiceBindings {
    /// `cf bind-service <app> <instance>`.
    async fn bind_service(&self, app: &str, instance: &str, timeout: Duration) -> Result<Output>;
    /// `cf unbind-service <app> <instance>`.
    async fn unbind_service(&self, app: &str, instance: &str, timeout: Duration)
    -> Result<Output>;
}

/// Composite trait: any type implementing all four sub-traits is a `PlatformGateway`.
pub trait PlatformGateway:
    ServiceLifecycle + ServiceInspector + ServiceKeys + ServiceBindings
{
}

/// Blanket implementation: any type implementing all four sub-traits is a `PlatformGateway`.
impl<T> PlatformGateway for T where
    T: ServiceLifecycle + ServiceInspector + ServiceKeys + ServiceBindings
{
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program within `timeout` and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(&self, program: &str, args: &[&str], timeout: Duration)
    -> Result<Output>;
}

// ── Health Port ───────────────────────────────────────────────────────────────

/// Probes a test app's health endpoint.
#[allow(async_fn_in_trait)]
pub trait HealthProbe {
    /// `Ok(true)` on a 2xx answer, `Ok(false)` when the app is not (yet)
    /// healthy or unreachable. `Err` only when the probe itself broke.
    async fn check(&self, url: &str, timeout: Duration) -> Result<bool>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts loading the suite configuration.
pub trait ConfigStore {
    /// Load and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read, parsed, or validated.
    fn load(&self) -> Result<SuiteConfig>;
    /// Location the configuration is read from.
    fn path(&self) -> &Path;
}
