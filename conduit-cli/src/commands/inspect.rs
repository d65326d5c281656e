//! Inspect command - print the content of a manifest

use super::load_manifest;
use crate::context::CliContext;
use crate::output::{OutputFormat, OutputFormatter};
use clap::Args;
use conduit::manifest::{Action, Entity};
use conduit::Manifest;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Manifest file (defaults to the configured manifest path)
    pub manifest: Option<PathBuf>,

    /// Show only the actions
    #[arg(long)]
    pub actions_only: bool,
}

pub async fn execute(ctx: &CliContext, args: InspectArgs) -> anyhow::Result<()> {
    let formatter = OutputFormatter::new(ctx.output_format);
    let path = ctx.manifest_path(args.manifest.as_deref());
    let manifest = load_manifest(&path).await?;

    if formatter.format() == OutputFormat::Json {
        if args.actions_only {
            formatter.json(&manifest.actions);
        } else {
            formatter.json(&manifest);
        }
        return Ok(());
    }

    if !args.actions_only {
        print_identity(&manifest, &formatter);
        print_entities(&manifest.entities, &formatter);
    }
    print_actions(&manifest.actions, &formatter);
    Ok(())
}

fn print_identity(manifest: &Manifest, formatter: &OutputFormatter) {
    formatter.section("Manifest");
    formatter.kv("id", &manifest.id);
    formatter.kv("version", &manifest.version);
    formatter.kv("domain", &manifest.domain);
}

fn print_entities(entities: &[Entity], formatter: &OutputFormatter) {
    formatter.section(&format!("Entities ({})", entities.len()));
    let rows: Vec<Vec<String>> = entities
        .iter()
        .map(|entity| vec![entity.id.clone(), entity_values(entity)])
        .collect();
    formatter.table(&["ENTITY", "VALUES"], &rows);
}

fn print_actions(actions: &[Action], formatter: &OutputFormatter) {
    formatter.section(&format!("Actions ({})", actions.len()));
    let rows: Vec<Vec<String>> = actions
        .iter()
        .map(|action| vec![action.name.clone(), action.id.clone(), action_parameters(action)])
        .collect();
    formatter.table(&["ACTION", "ID", "PARAMETERS"], &rows);
}

/// `Red [crimson, scarlet], Green`
fn entity_values(entity: &Entity) -> String {
    entity
        .values
        .iter()
        .map(|v| {
            if v.synonyms.is_empty() {
                v.keyword.clone()
            } else {
                let synonyms: Vec<&str> = v.synonyms.iter().map(String::as_str).collect();
                format!("{} [{}]", v.keyword, synonyms.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `color: home::Color (hue), brightness: u8`
fn action_parameters(action: &Action) -> String {
    action
        .parameters
        .iter()
        .map(|p| {
            if p.aliases.is_empty() {
                format!("{}: {}", p.name, p.qualified_type_name)
            } else {
                let aliases: Vec<&str> = p.aliases.iter().map(String::as_str).collect();
                format!("{}: {} ({})", p.name, p.qualified_type_name, aliases.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
