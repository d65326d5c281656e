//! Validate command - check a manifest for structural problems

use super::load_manifest;
use crate::context::CliContext;
use crate::output::{OutputFormat, OutputFormatter};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Manifest file (defaults to the configured manifest path)
    pub manifest: Option<PathBuf>,
}

pub async fn execute(ctx: &CliContext, args: ValidateArgs) -> anyhow::Result<()> {
    let formatter = OutputFormatter::new(ctx.output_format);
    let path = ctx.manifest_path(args.manifest.as_deref());
    let manifest = load_manifest(&path).await?;
    let issues: Vec<String> = manifest.validate().iter().map(ToString::to_string).collect();

    if formatter.format() == OutputFormat::Json {
        formatter.json(&serde_json::json!({
            "manifest": path.display().to_string(),
            "valid": issues.is_empty(),
            "issues": issues,
        }));
    } else if issues.is_empty() {
        formatter.success(&format!(
            "{} is valid ({} actions, {} entities)",
            path.display(),
            manifest.actions.len(),
            manifest.entities.len()
        ));
    } else {
        for issue in &issues {
            formatter.warning(issue);
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} issue(s) found in {}", issues.len(), path.display())
    }
}
