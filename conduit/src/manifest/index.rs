use super::{Action, Manifest, ManifestParameter};
use crate::error::{ConduitError, ConduitResult, ResolutionIssue};
use crate::parameters::ParameterProvider;
use crate::registry::{HandlerRegistry, ResolvedCallable};
use crate::utils::split_locator;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What to do when two actions in a manifest share an intent name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateActionPolicy {
    /// The first action in manifest order keeps the name; later ones are
    /// reported and left out of the index.
    #[default]
    FirstWins,
    /// Refuse to build an index.
    Reject,
}

/// A manifest action bound to its live callable.
#[derive(Debug, Clone)]
pub struct ResolvedAction {
    pub action: Action,
    pub callable: ResolvedCallable,
}

impl ResolvedAction {
    pub fn name(&self) -> &str {
        &self.action.name
    }

    /// Manifest entry for the formal parameter declared as `internal_name`.
    pub fn parameter(&self, internal_name: &str) -> Option<&ManifestParameter> {
        self.action.parameter(internal_name)
    }
}

/// Problems met while building a [`ResolvedIndex`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    pub resolved: usize,
    pub issues: Vec<ResolutionIssue>,
}

/// Read-only map from intent name (case-insensitive) to resolved action.
///
/// Built once from a manifest and never mutated; share it freely between
/// threads. Resolving again produces a new index.
#[derive(Debug, Clone, Default)]
pub struct ResolvedIndex {
    actions: IndexMap<String, ResolvedAction>,
    report: ResolutionReport,
}

impl ResolvedIndex {
    /// Resolve every action of `manifest` against the live `registry`.
    ///
    /// Actions whose callable cannot be found, or whose parameter list no
    /// longer matches the callable, are skipped and reported. Only a name
    /// collision under [`DuplicateActionPolicy::Reject`] is fatal.
    pub fn resolve(
        manifest: &Manifest,
        registry: &dyn HandlerRegistry,
        provider: &ParameterProvider,
        policy: DuplicateActionPolicy,
    ) -> ConduitResult<Self> {
        let mut actions: IndexMap<String, ResolvedAction> = IndexMap::new();
        let mut issues = Vec::new();

        for action in &manifest.actions {
            let callable = match resolve_action(action, registry, provider) {
                Ok(callable) => callable,
                Err(reason) => {
                    log::warn!(
                        "Could not resolve action '{}' ({}): {}",
                        action.name,
                        action.id,
                        reason
                    );
                    issues.push(ResolutionIssue::ActionResolutionFailure {
                        action: action.name.clone(),
                        id: action.id.clone(),
                        reason,
                    });
                    continue;
                }
            };

            let key = action.name.to_lowercase();
            if let Some(existing) = actions.get(&key) {
                match policy {
                    DuplicateActionPolicy::Reject => {
                        return Err(ConduitError::DuplicateAction {
                            name: action.name.clone(),
                            first: existing.action.id.clone(),
                            second: action.id.clone(),
                        });
                    }
                    DuplicateActionPolicy::FirstWins => {
                        log::warn!(
                            "Action name '{}' already bound to {}; ignoring {}",
                            action.name,
                            existing.action.id,
                            action.id
                        );
                        issues.push(ResolutionIssue::DuplicateAction {
                            name: action.name.clone(),
                            kept: existing.action.id.clone(),
                            dropped: action.id.clone(),
                        });
                        continue;
                    }
                }
            }

            actions.insert(
                key,
                ResolvedAction {
                    action: action.clone(),
                    callable,
                },
            );
        }

        log::info!(
            "Resolved {} of {} actions for {}",
            actions.len(),
            manifest.actions.len(),
            manifest.id
        );

        let report = ResolutionReport {
            resolved: actions.len(),
            issues,
        };
        Ok(Self { actions, report })
    }

    pub fn contains_action(&self, name: &str) -> bool {
        self.actions.contains_key(&name.to_lowercase())
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedAction> {
        self.actions.get(&name.to_lowercase())
    }

    pub fn get_callable(&self, name: &str) -> ConduitResult<&ResolvedCallable> {
        self.get(name)
            .map(|a| &a.callable)
            .ok_or_else(|| ConduitError::NotFound(name.to_string()))
    }

    /// Intent names in manifest order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.values().map(|a| a.action.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn report(&self) -> &ResolutionReport {
        &self.report
    }
}

fn resolve_action(
    action: &Action,
    registry: &dyn HandlerRegistry,
    provider: &ParameterProvider,
) -> Result<ResolvedCallable, String> {
    let (owner, method) =
        split_locator(&action.id).ok_or_else(|| "id is not a type::method locator".to_string())?;
    let callable = registry
        .resolve_callable(owner, method)
        .ok_or_else(|| format!("no callable {}::{} in registry", owner, method))?;

    // A stale manifest must not bind against a changed signature.
    let formals = &callable.descriptor.parameters;
    for formal in formals {
        if !provider.is_supported_parameter_type(&formal.parameter_type) {
            return Err(format!(
                "parameter '{}' has unsupported type {}",
                formal.name, formal.parameter_type
            ));
        }
        if !provider.is_specialized(&formal.parameter_type)
            && action.parameter(&formal.name).is_none()
        {
            return Err(format!("parameter '{}' missing from manifest", formal.name));
        }
    }
    for parameter in &action.parameters {
        if !formals.iter().any(|f| f.name == parameter.internal_name) {
            return Err(format!(
                "parameter '{}' no longer declared",
                parameter.internal_name
            ));
        }
    }

    Ok(callable)
}
