//! Infrastructure implementation of the platform gateway port traits.
//!
//! `CfCli<R>` routes every platform call through the `cf` command line
//! client via a `CommandRunner`.

use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{
    CommandRunner, CreateServiceRequest, ServiceBindings, ServiceInspector, ServiceKeys,
    ServiceLifecycle,
};
use crate::infra::command_runner::TokioCommandRunner;

/// Name of the Cloud Foundry command line client.
pub const CF_PROGRAM: &str = "cf";

/// Infrastructure adapter that routes all platform calls through a `CommandRunner`.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
#[derive(Debug, Clone)]
pub struct CfCli<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> CfCli<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    async fn cf(&self, args: &[&str], timeout: Duration, what: &str) -> Result<Output> {
        self.runner
            .run_with_timeout(CF_PROGRAM, args, timeout)
            .await
            .with_context(|| format!("cf {what}"))
    }
}

impl CfCli<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner)
    }
}

impl<R: CommandRunner> ServiceLifecycle for CfCli<R> {
    async fn create_service(
        &self,
        request: &CreateServiceRequest<'_>,
        timeout: Duration,
    ) -> Result<Output> {
        let mut args = vec![
            "create-service",
            "-b",
            request.broker,
            request.class,
            request.plan,
            request.name,
        ];
        if let Some(params) = request.parameters {
            args.push("-c");
            args.push(params);
        }
        self.cf(&args, timeout, "create-service").await
    }

    async fn delete_service(&self, name: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["delete-service", name, "-f"], timeout, "delete-service")
            .await
    }
}

impl<R: CommandRunner> ServiceInspector for CfCli<R> {
    async fn service_guid(&self, name: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["service", "--guid", name], timeout, "service --guid")
            .await
    }

    async fn service_info(&self, name: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["service", name], timeout, "service").await
    }
}

impl<R: CommandRunner> ServiceKeys for CfCli<R> {
    async fn create_service_key(
        &self,
        instance: &str,
        key: &str,
        timeout: Duration,
    ) -> Result<Output> {
        self.cf(
            &["create-service-key", instance, key],
            timeout,
            "create-service-key",
        )
        .await
    }

    async fn service_key_guid(&self, instance: &str, key: &str, timeout: Duration) -> Result<Output> {
        self.cf(
            &["service-key", "--guid", instance, key],
            timeout,
            "service-key --guid",
        )
        .await
    }

    async fn fetch_service_key(&self, guid: &str, timeout: Duration) -> Result<Output> {
        let path = format!("/v2/service_keys/{guid}");
        self.cf(&["curl", "--fail", &path], timeout, "curl").await
    }

    async fn delete_service_key(
        &self,
        instance: &str,
        key: &str,
        timeout: Duration,
    ) -> Result<Output> {
        self.cf(
            &["delete-service-key", instance, key, "-f"],
            timeout,
            "delete-service-key",
        )
        .await
    }
}

impl<R: CommandRunner> ServiceBindings for CfCli<R> {
    async fn bind_service(&self, app: &str, instance: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["bind-service", app, instance], timeout, "bind-service")
            .await
    }

    async fn unbind_service(&self, app: &str, instance: &str, timeout: Duration) -> Result<Output> {
        self.cf(&["unbind-service", app, instance], timeout, "unbind-service")
            .await
    }
}
