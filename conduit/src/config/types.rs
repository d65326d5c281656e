use crate::manifest::DuplicateActionPolicy;
use crate::parameters::{RESPONSE_KEY, RESPONSE_TYPE_NAME};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default manifest location, relative to the working directory.
pub const DEFAULT_MANIFEST_PATH: &str = "conduit_manifest.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConduitConfig {
    #[serde(default)]
    pub app: AppIdentity,
    #[serde(default)]
    pub manifest: ManifestConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub parameters: ParameterConfig,
}

/// Identity written at the top of an extracted manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppIdentity {
    pub id: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub domain: String,
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self {
            id: "conduit-app".to_string(),
            version: default_version(),
            domain: String::new(),
        }
    }
}

fn default_version() -> String {
    "0.1.0".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestConfig {
    #[serde(default = "default_manifest_path")]
    pub path: PathBuf,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: default_manifest_path(),
        }
    }
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from(DEFAULT_MANIFEST_PATH)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default)]
    pub duplicate_actions: DuplicateActionPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterConfig {
    #[serde(default = "default_specialized")]
    pub specialized: Vec<SpecializedType>,
}

impl Default for ParameterConfig {
    fn default() -> Self {
        Self {
            specialized: default_specialized(),
        }
    }
}

fn default_specialized() -> Vec<SpecializedType> {
    vec![SpecializedType {
        type_name: RESPONSE_TYPE_NAME.to_string(),
        key: RESPONSE_KEY.to_string(),
    }]
}

/// An object type bound from the dispatch context instead of the NLU
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecializedType {
    pub type_name: String,
    pub key: String,
}
