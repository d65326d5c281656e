//! TOML configuration.
//!
//! Every section is optional; a missing file yields the defaults.

pub mod types;

pub use types::{
    AppIdentity, ConduitConfig, DispatchConfig, ManifestConfig, ParameterConfig, SpecializedType,
    DEFAULT_MANIFEST_PATH,
};

use crate::error::{ConduitError, ConduitResult};
use crate::parameters::ParameterProvider;
use std::path::Path;

impl ConduitConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: impl AsRef<Path>) -> ConduitResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConduitError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConduitError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Provider with exactly the configured specialized types.
    pub fn parameter_provider(&self) -> ParameterProvider {
        self.parameters
            .specialized
            .iter()
            .fold(ParameterProvider::empty(), |provider, s| {
                provider.with_specialized(&s.type_name, &s.key)
            })
    }
}
