pub mod config;
pub mod duration;
pub mod types;

pub use config::{
    AppTarget, BrokerConfig, ConfigError, OverrideParams, ProvisioningConfig, SuiteConfig,
    TestConfig, TestsConfig, TimeoutsConfig,
};
pub use types::*;
