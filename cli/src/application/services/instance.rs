//! Service instance controller: create, wait, bind, read credentials and
//! tear down one broker-provisioned service instance.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::collections::BTreeSet;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::application::ports::{CreateServiceRequest, PlatformGateway};
use crate::domain::{
    Credentials, ProvisioningCondition, SERVICE_KEY_NAME, ServiceError, encode_parameters,
};

use super::{credentials, failure_reason, poller, run_error_reason, stdout_line};

/// Where an instance is in its lifecycle. Bindings are tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstancePhase {
    Unprovisioned,
    Creating,
    Ready,
    Destroying,
    Destroyed,
}

/// Service class and plan to provision from the broker.
#[derive(Debug, Clone, Copy)]
pub struct ServiceOffering<'a> {
    pub class: &'a str,
    pub plan: &'a str,
}

/// One service instance, driven step by step by its caller.
///
/// Every step except [`destroy`](Self::destroy) fails fast with a
/// [`ServiceError`]. `destroy` is best effort and may be called from any
/// phase, any number of times. An instance is owned by a single scenario.
pub struct ServiceInstance<'g, G: PlatformGateway> {
    gateway: &'g G,
    name: String,
    broker: String,
    guid: Option<String>,
    credentials: Option<Credentials>,
    key_requested: bool,
    bindings: BTreeSet<String>,
    phase: InstancePhase,
}

impl<'g, G: PlatformGateway> ServiceInstance<'g, G> {
    /// A not yet provisioned instance named `name`, offered by `broker`.
    pub fn new(gateway: &'g G, name: impl Into<String>, broker: impl Into<String>) -> Self {
        Self {
            gateway,
            name: name.into(),
            broker: broker.into(),
            guid: None,
            credentials: None,
            key_requested: false,
            bindings: BTreeSet::new(),
            phase: InstancePhase::Unprovisioned,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn broker(&self) -> &str {
        &self.broker
    }

    /// Platform-assigned guid, known once [`create`](Self::create) succeeded.
    #[must_use]
    pub fn guid(&self) -> Option<&str> {
        self.guid.as_deref()
    }

    #[must_use]
    pub fn phase(&self) -> InstancePhase {
        self.phase
    }

    /// Apps the instance is currently bound to.
    #[must_use]
    pub fn bindings(&self) -> &BTreeSet<String> {
        &self.bindings
    }

    /// Request the instance from the broker and resolve its guid.
    ///
    /// `params` of `None` sends no `-c` flag; `Some({})` sends `{}`.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidParameters`] if `params` cannot be encoded.
    /// - [`ServiceError::CreateFailed`] if `cf create-service` fails.
    /// - [`ServiceError::IdResolutionFailed`] if the guid lookup fails or
    ///   prints nothing.
    pub async fn create(
        &mut self,
        offering: ServiceOffering<'_>,
        params: Option<&Value>,
        timeout: Duration,
    ) -> Result<(), ServiceError> {
        let parameters =
            encode_parameters(params).map_err(|e| ServiceError::InvalidParameters {
                instance: self.name.clone(),
                reason: e.to_string(),
            })?;
        let request = CreateServiceRequest {
            broker: &self.broker,
            class: offering.class,
            plan: offering.plan,
            name: &self.name,
            parameters: parameters.as_deref(),
        };

        info!(
            instance = %self.name,
            class = %offering.class,
            plan = %offering.plan,
            "creating service instance"
        );
        self.phase = InstancePhase::Creating;
        let output = self
            .gateway
            .create_service(&request, timeout)
            .await
            .map_err(|e| ServiceError::CreateFailed {
                instance: self.name.clone(),
                reason: run_error_reason("cf create-service", &e),
            })?;
        if !output.status.success() {
            return Err(ServiceError::CreateFailed {
                instance: self.name.clone(),
                reason: failure_reason("cf create-service", &output),
            });
        }

        let lookup = self
            .gateway
            .service_guid(&self.name, timeout)
            .await
            .map_err(|e| ServiceError::IdResolutionFailed {
                instance: self.name.clone(),
                reason: run_error_reason("cf service --guid", &e),
            })?;
        if !lookup.status.success() {
            return Err(ServiceError::IdResolutionFailed {
                instance: self.name.clone(),
                reason: failure_reason("cf service --guid", &lookup),
            });
        }
        let guid = stdout_line(&lookup);
        if guid.is_empty() {
            return Err(ServiceError::IdResolutionFailed {
                instance: self.name.clone(),
                reason: "cf service --guid printed no guid".to_string(),
            });
        }
        debug!(instance = %self.name, guid = %guid, "service instance guid resolved");
        self.guid = Some(guid);
        Ok(())
    }

    /// Wait until the broker reports `create succeeded`.
    ///
    /// # Errors
    ///
    /// Returns the poller's error unchanged.
    pub async fn wait_for_create(&mut self, timeout: Duration) -> Result<(), ServiceError> {
        poller::wait_for(self.gateway, &self.name, &ProvisioningCondition::create(), timeout)
            .await?;
        info!(instance = %self.name, "service instance ready");
        self.phase = InstancePhase::Ready;
        Ok(())
    }

    /// Wait until the broker reports `delete succeeded`.
    ///
    /// # Errors
    ///
    /// Returns the poller's error unchanged.
    pub async fn wait_for_delete(&self, timeout: Duration) -> Result<(), ServiceError> {
        poller::wait_for(self.gateway, &self.name, &ProvisioningCondition::delete(), timeout).await
    }

    /// Bind the instance to `app`. Binding is synchronous; nothing is polled.
    ///
    /// # Errors
    ///
    /// [`ServiceError::BindFailed`] if `cf bind-service` fails.
    pub async fn bind(&mut self, app: &str, timeout: Duration) -> Result<(), ServiceError> {
        let bind_failed = |reason| ServiceError::BindFailed {
            instance: self.name.clone(),
            app: app.to_string(),
            reason,
        };
        let output = self
            .gateway
            .bind_service(app, &self.name, timeout)
            .await
            .map_err(|e| bind_failed(run_error_reason("cf bind-service", &e)))?;
        if !output.status.success() {
            return Err(bind_failed(failure_reason("cf bind-service", &output)));
        }
        info!(instance = %self.name, app = %app, "service instance bound");
        self.bindings.insert(app.to_string());
        Ok(())
    }

    /// Unbind the instance from `app`.
    ///
    /// # Errors
    ///
    /// [`ServiceError::UnbindFailed`] if `cf unbind-service` fails.
    pub async fn unbind(&mut self, app: &str, timeout: Duration) -> Result<(), ServiceError> {
        self.unbind_app(app, timeout).await?;
        self.bindings.remove(app);
        Ok(())
    }

    async fn unbind_app(&self, app: &str, timeout: Duration) -> Result<(), ServiceError> {
        let unbind_failed = |reason| ServiceError::UnbindFailed {
            instance: self.name.clone(),
            app: app.to_string(),
            reason,
        };
        let output = self
            .gateway
            .unbind_service(app, &self.name, timeout)
            .await
            .map_err(|e| unbind_failed(run_error_reason("cf unbind-service", &e)))?;
        if !output.status.success() {
            return Err(unbind_failed(failure_reason("cf unbind-service", &output)));
        }
        info!(instance = %self.name, app = %app, "service instance unbound");
        Ok(())
    }

    /// Connection credentials, issued through a service key on first call
    /// and cached until the instance is destroyed.
    ///
    /// # Errors
    ///
    /// Returns the resolver's error unchanged.
    pub async fn credentials(&mut self, timeout: Duration) -> Result<&Credentials, ServiceError> {
        if self.credentials.is_none() {
            self.key_requested = true;
        }
        credentials::resolve(
            self.gateway,
            &self.name,
            SERVICE_KEY_NAME,
            &mut self.credentials,
            timeout,
        )
        .await
    }

    /// Tear the instance down. Never fails.
    ///
    /// Unbinds remaining apps, deletes the service key if one was requested,
    /// deletes the instance and waits for the deletion to finish. Each
    /// failing step is logged and the next one is still attempted.
    pub async fn destroy(&mut self, timeout: Duration) {
        match self.phase {
            InstancePhase::Destroyed => return,
            InstancePhase::Unprovisioned => {
                self.phase = InstancePhase::Destroyed;
                return;
            }
            InstancePhase::Creating | InstancePhase::Ready | InstancePhase::Destroying => {}
        }
        info!(instance = %self.name, "destroying service instance");
        self.phase = InstancePhase::Destroying;

        for app in std::mem::take(&mut self.bindings) {
            if let Err(e) = self.unbind_app(&app, timeout).await {
                warn!(instance = %self.name, app = %app, error = %e, "cleanup: unbind failed");
            }
        }

        if self.key_requested {
            match self
                .gateway
                .delete_service_key(&self.name, SERVICE_KEY_NAME, timeout)
                .await
            {
                Ok(output) if output.status.success() => {
                    debug!(instance = %self.name, "service key deleted");
                }
                Ok(output) => warn!(
                    instance = %self.name,
                    reason = %failure_reason("cf delete-service-key", &output),
                    "cleanup: service key deletion failed"
                ),
                Err(e) => warn!(
                    instance = %self.name,
                    error = %format!("{e:#}"),
                    "cleanup: service key deletion failed"
                ),
            }
        }

        match self.gateway.delete_service(&self.name, timeout).await {
            Ok(output) if output.status.success() => {}
            Ok(output) => warn!(
                instance = %self.name,
                reason = %failure_reason("cf delete-service", &output),
                "cleanup: service deletion failed"
            ),
            Err(e) => warn!(
                instance = %self.name,
                error = %format!("{e:#}"),
                "cleanup: service deletion failed"
            ),
        }

        match self.wait_for_delete(timeout).await {
            Ok(()) => info!(instance = %self.name, "service instance deleted"),
            // `cf service` fails once the instance no longer exists.
            Err(ServiceError::QueryFailed { reason, .. }) => {
                debug!(instance = %self.name, reason = %reason, "service instance gone");
            }
            Err(e) => warn!(instance = %self.name, error = %e, "cleanup: waiting for deletion failed"),
        }

        self.credentials = None;
        self.key_requested = false;
        self.phase = InstancePhase::Destroyed;
    }
}

impl<G: PlatformGateway> Drop for ServiceInstance<'_, G> {
    fn drop(&mut self) {
        if matches!(
            self.phase,
            InstancePhase::Creating | InstancePhase::Ready | InstancePhase::Destroying
        ) {
            warn!(
                instance = %self.name,
                phase = ?self.phase,
                "service instance dropped without destroy; it may be leaked on the platform"
            );
        }
    }
}
