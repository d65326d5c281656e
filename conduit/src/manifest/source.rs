use super::Manifest;
use crate::error::{ConduitError, ConduitResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Where a manifest document comes from at start-up.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    async fn load(&self) -> ConduitResult<Manifest>;

    fn name(&self) -> &str;
}

/// Manifest stored as a JSON file.
pub struct FileManifestSource {
    path: PathBuf,
}

impl FileManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ManifestSource for FileManifestSource {
    async fn load(&self) -> ConduitResult<Manifest> {
        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|source| ConduitError::Io {
                path: self.path.clone(),
                source,
            })?;
        let manifest = Manifest::from_document(&content)?;
        log::info!(
            "Loaded manifest {} v{} from {}: {} actions, {} entities",
            manifest.id,
            manifest.version,
            self.path.display(),
            manifest.actions.len(),
            manifest.entities.len()
        );
        Ok(manifest)
    }

    fn name(&self) -> &str {
        "FileManifest"
    }
}

/// Manifest document embedded in the binary or fetched by other means.
pub struct InMemoryManifestSource {
    document: String,
}

impl InMemoryManifestSource {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }
}

#[async_trait]
impl ManifestSource for InMemoryManifestSource {
    async fn load(&self) -> ConduitResult<Manifest> {
        Manifest::from_document(&self.document)
    }

    fn name(&self) -> &str {
        "InMemoryManifest"
    }
}

/// Write `manifest` as a JSON document, creating parent directories.
pub async fn write_manifest(path: impl AsRef<Path>, manifest: &Manifest) -> ConduitResult<()> {
    let path = path.as_ref();
    let io_err = |source| ConduitError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    let mut document = manifest.to_document()?;
    document.push('\n');
    fs::write(path, document).await.map_err(io_err)?;
    log::info!("Wrote manifest {} to {}", manifest.id, path.display());
    Ok(())
}
