//! Suite configuration schema.
//!
//! Loaded once by the CLI from a YAML document and passed by reference into
//! every scenario. Unknown keys are rejected so typos fail loudly instead of
//! silently disabling a test.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Backend;

/// Validation errors for an otherwise well-formed configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("broker.name must not be empty")]
    EmptyBrokerName,

    #[error("tests.{backend}.{field} must not be empty when the test is enabled")]
    MissingField {
        backend: Backend,
        field: &'static str,
    },

    #[error("tests.{backend}.app.{field} must not be empty")]
    InvalidApp {
        backend: Backend,
        field: &'static str,
    },

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Root of the suite configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    /// Broker under test.
    pub broker: BrokerConfig,

    /// Broker-side provisioning behaviour.
    #[serde(default)]
    pub provisioning: ProvisioningConfig,

    /// Per-backend scenario settings.
    #[serde(default)]
    pub tests: TestsConfig,

    /// Wall-clock budgets for platform operations.
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerConfig {
    /// Name the broker is registered under on the platform.
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvisioningConfig {
    #[serde(default)]
    pub override_params: OverrideParams,
}

/// When enabled, the broker injects its own provisioning parameters and the
/// suite must not send optional ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideParams {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mariadb: Option<TestConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mysql: Option<TestConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postgresql: Option<TestConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redis: Option<TestConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mongodb: Option<TestConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rabbitmq: Option<TestConfig>,
}

impl TestsConfig {
    /// Settings for `backend`, if the document mentions it at all.
    #[must_use]
    pub fn get(&self, backend: Backend) -> Option<&TestConfig> {
        match backend {
            Backend::MariaDb => self.mariadb.as_ref(),
            Backend::MySql => self.mysql.as_ref(),
            Backend::PostgreSql => self.postgresql.as_ref(),
            Backend::Redis => self.redis.as_ref(),
            Backend::MongoDb => self.mongodb.as_ref(),
            Backend::RabbitMq => self.rabbitmq.as_ref(),
        }
    }

    /// Backends whose test is present and enabled.
    #[must_use]
    pub fn enabled(&self) -> Vec<Backend> {
        Backend::ALL
            .into_iter()
            .filter(|b| self.get(*b).is_some_and(|t| t.enabled))
            .collect()
    }
}

/// Settings for one backend scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Service class offered by the broker, e.g. `redis`.
    #[serde(default)]
    pub class: String,

    /// Plan of the service class, e.g. `5-0-7`.
    #[serde(default)]
    pub plan: String,

    /// Externally deployed test app to bind the instance to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<AppTarget>,
}

/// A test application deployed outside the suite, reachable over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppTarget {
    /// Platform app name used for bind/unbind.
    pub name: String,
    /// Health endpoint answering 2xx once the app reached its backend.
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutsConfig {
    /// Budget for a single synchronous platform command.
    #[serde(default = "default_command_timeout", with = "crate::duration")]
    pub command: Duration,

    /// Budget for asynchronous provisioning to reach a terminal status.
    #[serde(default = "default_create_service_timeout", with = "crate::duration")]
    pub create_service: Duration,

    /// Budget for a bound app's health endpoint to answer 2xx.
    #[serde(default = "default_health_timeout", with = "crate::duration")]
    pub health: Duration,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            command: default_command_timeout(),
            create_service: default_create_service_timeout(),
            health: default_health_timeout(),
        }
    }
}

fn default_command_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_create_service_timeout() -> Duration {
    Duration::from_secs(15 * 60)
}

fn default_health_timeout() -> Duration {
    Duration::from_secs(60)
}

impl SuiteConfig {
    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker.name.trim().is_empty() {
            return Err(ConfigError::EmptyBrokerName);
        }
        for backend in Backend::ALL {
            let Some(test) = self.tests.get(backend) else {
                continue;
            };
            if !test.enabled {
                continue;
            }
            if test.class.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    backend,
                    field: "class",
                });
            }
            if test.plan.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    backend,
                    field: "plan",
                });
            }
            if let Some(app) = &test.app {
                if app.name.trim().is_empty() {
                    return Err(ConfigError::InvalidApp {
                        backend,
                        field: "name",
                    });
                }
                if app.url.trim().is_empty() {
                    return Err(ConfigError::InvalidApp {
                        backend,
                        field: "url",
                    });
                }
            }
        }
        for (name, value) in [
            ("command", self.timeouts.command),
            ("create_service", self.timeouts.create_service),
            ("health", self.timeouts.health),
        ] {
            if value.is_zero() {
                return Err(ConfigError::ZeroTimeout(name));
            }
        }
        Ok(())
    }
}
