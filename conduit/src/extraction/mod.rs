//! Extraction of actions and entities from a handler registry.
//!
//! Runs once, usually as a build step. The output order follows registry
//! discovery order, so extracting twice from an unchanged registry yields
//! the same manifest document byte for byte.

pub mod signature;

pub use signature::{signature_of, SignatureStats};

use crate::config::AppIdentity;
use crate::error::ExtractionIssue;
use crate::manifest::{Action, Entity, EntityValue, Manifest, ManifestParameter, ENUM_ENTITY_TYPE};
use crate::parameters::ParameterProvider;
use crate::registry::{CallableDescriptor, EnumDescriptor, HandlerRegistry};
use crate::utils::{qualified_parameter_name, sanitize_name};
use indexmap::IndexSet;
use signature::tally;
use std::collections::HashSet;

/// Result of [`Extractor::extract_actions`].
#[derive(Debug, Clone, Default)]
pub struct ActionExtraction {
    pub actions: Vec<Action>,
    /// Every tagged callable's signature.
    pub signature_stats: SignatureStats,
    /// Signatures of the tagged callables that were rejected.
    pub incompatible_stats: SignatureStats,
    pub issues: Vec<ExtractionIssue>,
}

/// Diagnostics of a full extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub signature_stats: SignatureStats,
    pub incompatible_stats: SignatureStats,
    pub issues: Vec<ExtractionIssue>,
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub manifest: Manifest,
    pub report: ExtractionReport,
}

pub struct Extractor<'a> {
    provider: &'a ParameterProvider,
}

impl<'a> Extractor<'a> {
    pub fn new(provider: &'a ParameterProvider) -> Self {
        Self { provider }
    }

    /// Build a complete manifest for `identity`.
    pub fn extract(&self, registry: &dyn HandlerRegistry, identity: &AppIdentity) -> Extraction {
        let (entities, mut issues) = self.extract_entities(registry);
        let actions = self.extract_actions(registry);
        issues.extend(actions.issues);

        let mut manifest = Manifest::new(&identity.id, &identity.version, &identity.domain);
        manifest.entities = entities;
        manifest.actions = actions.actions;

        log::info!(
            "Extracted {} actions and {} entities for {} ({} issues)",
            manifest.actions.len(),
            manifest.entities.len(),
            manifest.id,
            issues.len()
        );

        Extraction {
            manifest,
            report: ExtractionReport {
                signature_stats: actions.signature_stats,
                incompatible_stats: actions.incompatible_stats,
                issues,
            },
        }
    }

    /// One entity per tagged enumeration. Enumerations whose values cannot
    /// be listed are skipped.
    pub fn extract_entities(
        &self,
        registry: &dyn HandlerRegistry,
    ) -> (Vec<Entity>, Vec<ExtractionIssue>) {
        let mut entities = Vec::new();
        let mut issues = Vec::new();

        for listed in registry.list_tagged_enum_types() {
            match listed {
                Ok(descriptor) => entities.push(entity_of(&descriptor)),
                Err(err) => {
                    log::warn!("Failed to enumerate values of {}: {}", err.type_name, err.reason);
                    issues.push(ExtractionIssue::EnumEnumerationFailure {
                        type_name: err.type_name,
                        reason: err.reason,
                    });
                }
            }
        }

        (entities, issues)
    }

    /// One action per tagged callable whose parameters are all supported.
    pub fn extract_actions(&self, registry: &dyn HandlerRegistry) -> ActionExtraction {
        let mut out = ActionExtraction::default();
        let mut qualified_names = HashSet::new();

        for callable in registry.list_callables().into_iter().filter(|c| c.tagged) {
            let signature = signature_of(&callable);
            tally(&mut out.signature_stats, &signature);

            if let Some(issue) = self.check_parameters(&callable) {
                log::warn!("{}", issue);
                if matches!(issue, ExtractionIssue::UnsupportedParameterType { .. }) {
                    tally(&mut out.incompatible_stats, &signature);
                }
                out.issues.push(issue);
                continue;
            }

            let action = self.action_of(&callable);
            // Flattened locators can collide; the first action keeps the key.
            if let Some(taken) = action
                .parameters
                .iter()
                .find(|p| qualified_names.contains(&p.qualified_name))
            {
                let issue = ExtractionIssue::DuplicateQualifiedName {
                    callable: callable.locator(),
                    qualified_name: taken.qualified_name.clone(),
                };
                log::warn!("{}", issue);
                out.issues.push(issue);
                continue;
            }
            qualified_names.extend(action.parameters.iter().map(|p| p.qualified_name.clone()));

            log::debug!("Extracted action {} ({})", callable.locator(), signature);
            out.actions.push(action);
        }

        out
    }

    /// Unsupported types are reported before name clashes, so a callable
    /// with both still counts as incompatible.
    fn check_parameters(&self, callable: &CallableDescriptor) -> Option<ExtractionIssue> {
        if let Some(parameter) = callable
            .parameters
            .iter()
            .find(|p| !self.provider.is_supported_parameter_type(&p.parameter_type))
        {
            return Some(ExtractionIssue::UnsupportedParameterType {
                callable: callable.locator(),
                parameter: parameter.name.clone(),
                type_name: parameter.parameter_type.qualified_name(),
            });
        }

        let mut names = HashSet::new();
        callable
            .parameters
            .iter()
            .find(|p| !names.insert(sanitize_name(&p.name)))
            .map(|parameter| ExtractionIssue::DuplicateParameterName {
                callable: callable.locator(),
                parameter: parameter.name.clone(),
            })
    }

    fn action_of(&self, callable: &CallableDescriptor) -> Action {
        let id = callable.locator();
        let parameters = callable
            .parameters
            .iter()
            .filter(|p| !self.provider.is_specialized(&p.parameter_type))
            .map(|p| {
                let name = sanitize_name(&p.name);
                let aliases: IndexSet<String> = p
                    .aliases
                    .iter()
                    .map(|a| sanitize_name(a))
                    .filter(|a| !a.is_empty() && a != &name)
                    .collect();
                ManifestParameter {
                    qualified_name: qualified_parameter_name(&id, &p.name),
                    name,
                    internal_name: p.name.clone(),
                    qualified_type_name: p.parameter_type.qualified_name(),
                    type_assembly: p.parameter_type.owner().to_string(),
                    aliases,
                }
            })
            .collect();

        Action {
            name: callable
                .intent
                .clone()
                .unwrap_or_else(|| sanitize_name(&callable.method)),
            id,
            assembly: callable.module.clone(),
            parameters,
        }
    }
}

fn entity_of(descriptor: &EnumDescriptor) -> Entity {
    let mut keywords = HashSet::new();
    let values = descriptor
        .members
        .iter()
        .filter(|m| {
            let fresh = keywords.insert(m.name.as_str());
            if !fresh {
                log::warn!(
                    "Duplicate member {} in {}",
                    m.name,
                    descriptor.qualified_name()
                );
            }
            fresh
        })
        .map(|m| EntityValue::new(m.name.as_str(), m.aliases.iter().map(String::as_str)))
        .collect();

    Entity {
        id: descriptor.qualified_name(),
        entity_type: ENUM_ENTITY_TYPE.to_string(),
        namespace: descriptor.namespace.clone(),
        name: descriptor.type_name.clone(),
        assembly: descriptor.module.clone(),
        values,
    }
}
