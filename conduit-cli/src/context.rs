//! CLI context - configuration and preferences shared by all commands

use crate::output::OutputFormat;
use anyhow::Context;
use conduit::ConduitConfig;
use std::path::{Path, PathBuf};

/// Config files tried, in order, when `--config` is not given.
const DEFAULT_CONFIG_PATHS: [&str; 2] = ["conduit.toml", "config/conduit.toml"];

pub struct CliContext {
    /// Path to the configuration file
    pub config_path: PathBuf,
    pub config: ConduitConfig,
    pub output_format: OutputFormat,
}

impl CliContext {
    pub fn new(config_path: PathBuf) -> anyhow::Result<Self> {
        let config = ConduitConfig::load(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))?;
        Ok(Self {
            config_path,
            config,
            output_format: OutputFormat::Table,
        })
    }

    /// Context from the first default config file found, or defaults.
    pub fn with_defaults() -> anyhow::Result<Self> {
        for path in DEFAULT_CONFIG_PATHS {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::new(path);
            }
        }

        Ok(Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATHS[0]),
            config: ConduitConfig::default(),
            output_format: OutputFormat::Table,
        })
    }

    /// Manifest to operate on: the explicit argument, else the configured path.
    pub fn manifest_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.manifest.path.clone())
    }
}
