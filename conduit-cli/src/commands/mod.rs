//! CLI command implementations

pub mod inspect;
pub mod validate;

use anyhow::Context;
use conduit::manifest::{FileManifestSource, ManifestSource};
use conduit::Manifest;
use std::path::Path;

async fn load_manifest(path: &Path) -> anyhow::Result<Manifest> {
    let source = FileManifestSource::new(path);
    source
        .load()
        .await
        .with_context(|| format!("{} could not load {}", source.name(), path.display()))
}
