//! Infrastructure implementation of the `ConfigStore` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mits_common::SuiteConfig;

use crate::application::ports::ConfigStore;

/// Configuration file used when neither `--config` nor `MITS_CONFIG` is set.
pub const DEFAULT_CONFIG_PATH: &str = "mits.yaml";

/// Production implementation of `ConfigStore` that reads a YAML file on disk.
#[derive(Debug, Clone)]
pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for YamlConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<SuiteConfig> {
        let path = &self.path;
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config: SuiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
