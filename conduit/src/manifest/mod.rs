//! The manifest: every action and entity the application exposes to the
//! NLU service, plus the application's identity.
//!
//! A manifest is produced by the extractor at build time, written out as a
//! JSON document, loaded at start-up and resolved into a [`ResolvedIndex`].

mod index;
mod source;

pub use index::{DuplicateActionPolicy, ResolutionReport, ResolvedAction, ResolvedIndex};
pub use source::{
    write_manifest, FileManifestSource, InMemoryManifestSource, ManifestSource,
};

use crate::error::ConduitResult;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Entity `type` written for enumerations.
pub const ENUM_ENTITY_TYPE: &str = "enum";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityValue {
    pub keyword: String,
    #[serde(default)]
    pub synonyms: IndexSet<String>,
}

impl EntityValue {
    /// Build a value; the keyword itself is never kept as a synonym.
    pub fn new<I, S>(keyword: impl Into<String>, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keyword = keyword.into();
        let synonyms = synonyms
            .into_iter()
            .map(Into::into)
            .filter(|s: &String| s != &keyword)
            .collect();
        Self { keyword, synonyms }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub namespace: String,
    pub name: String,
    /// Module owning the enumeration.
    pub assembly: String,
    #[serde(default)]
    pub values: Vec<EntityValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestParameter {
    pub name: String,
    pub internal_name: String,
    pub qualified_type_name: String,
    pub type_assembly: String,
    #[serde(default)]
    pub aliases: IndexSet<String>,
    pub qualified_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// `{declaring_type}::{method}`; only used to find the callable again.
    pub id: String,
    /// Intent name.
    pub name: String,
    pub assembly: String,
    #[serde(default)]
    pub parameters: Vec<ManifestParameter>,
}

impl Action {
    pub fn parameter(&self, internal_name: &str) -> Option<&ManifestParameter> {
        self.parameters
            .iter()
            .find(|p| p.internal_name == internal_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub id: String,
    pub version: String,
    pub domain: String,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// Structural problem in a manifest document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestIssue {
    DuplicateEntity(String),
    DuplicateKeyword { entity: String, keyword: String },
    DuplicateParameter { action: String, parameter: String },
    DuplicateQualifiedName(String),
    DuplicateActionName { name: String, ids: Vec<String> },
}

impl fmt::Display for ManifestIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestIssue::DuplicateEntity(name) => write!(f, "entity '{}' declared twice", name),
            ManifestIssue::DuplicateKeyword { entity, keyword } => {
                write!(f, "entity '{}' repeats keyword '{}'", entity, keyword)
            }
            ManifestIssue::DuplicateParameter { action, parameter } => {
                write!(f, "action '{}' repeats parameter '{}'", action, parameter)
            }
            ManifestIssue::DuplicateQualifiedName(name) => {
                write!(f, "qualified parameter name '{}' is not unique", name)
            }
            ManifestIssue::DuplicateActionName { name, ids } => {
                write!(f, "action name '{}' used by {}", name, ids.join(", "))
            }
        }
    }
}

impl Manifest {
    pub fn new(
        id: impl Into<String>,
        version: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            domain: domain.into(),
            entities: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Pretty-printed JSON document. Output depends only on content and
    /// order, so identical manifests produce identical bytes.
    pub fn to_document(&self) -> ConduitResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_document(document: &str) -> ConduitResult<Self> {
        Ok(serde_json::from_str(document)?)
    }

    pub fn to_json(&self) -> ConduitResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json(value: serde_json::Value) -> ConduitResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Check the uniqueness rules of the document.
    pub fn validate(&self) -> Vec<ManifestIssue> {
        let mut issues = Vec::new();

        let mut entity_names = HashSet::new();
        for entity in &self.entities {
            if !entity_names.insert(entity.name.as_str()) {
                issues.push(ManifestIssue::DuplicateEntity(entity.name.clone()));
            }
            let mut keywords = HashSet::new();
            for value in &entity.values {
                if !keywords.insert(value.keyword.as_str()) {
                    issues.push(ManifestIssue::DuplicateKeyword {
                        entity: entity.name.clone(),
                        keyword: value.keyword.clone(),
                    });
                }
            }
        }

        let mut qualified = HashSet::new();
        let mut by_name: HashMap<String, Vec<String>> = HashMap::new();
        let mut name_order = Vec::new();
        for action in &self.actions {
            let mut names = HashSet::new();
            for parameter in &action.parameters {
                if !names.insert(parameter.name.as_str()) {
                    issues.push(ManifestIssue::DuplicateParameter {
                        action: action.name.clone(),
                        parameter: parameter.name.clone(),
                    });
                }
                if !qualified.insert(parameter.qualified_name.as_str()) {
                    issues.push(ManifestIssue::DuplicateQualifiedName(
                        parameter.qualified_name.clone(),
                    ));
                }
            }
            let key = action.name.to_lowercase();
            if !by_name.contains_key(&key) {
                name_order.push(key.clone());
            }
            by_name.entry(key).or_default().push(action.id.clone());
        }

        for key in name_order {
            if let Some(ids) = by_name.remove(&key) {
                if ids.len() > 1 {
                    issues.push(ManifestIssue::DuplicateActionName { name: key, ids });
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parameter(action: &str, name: &str) -> ManifestParameter {
        ManifestParameter {
            name: name.to_string(),
            internal_name: name.to_string(),
            qualified_type_name: "i32".to_string(),
            type_assembly: "std".to_string(),
            aliases: IndexSet::new(),
            qualified_name: format!("{}_{}", action, name),
        }
    }

    #[test]
    fn serializes_with_document_keys() {
        let mut manifest = Manifest::new("app", "1.0.0", "App");
        manifest.entities.push(Entity {
            id: "game::Color".to_string(),
            entity_type: ENUM_ENTITY_TYPE.to_string(),
            namespace: "game".to_string(),
            name: "Color".to_string(),
            assembly: "game".to_string(),
            values: vec![EntityValue::new("Red", ["Red", "crimson"])],
        });
        manifest.actions.push(Action {
            id: "game::Lights::dim".to_string(),
            name: "dim".to_string(),
            assembly: "game".to_string(),
            parameters: vec![parameter("game_lights_dim", "level")],
        });

        let json = manifest.to_json().expect("serialize");
        assert_eq!(
            json,
            json!({
                "id": "app",
                "version": "1.0.0",
                "domain": "App",
                "entities": [{
                    "id": "game::Color",
                    "type": "enum",
                    "namespace": "game",
                    "name": "Color",
                    "assembly": "game",
                    "values": [{"keyword": "Red", "synonyms": ["crimson"]}]
                }],
                "actions": [{
                    "id": "game::Lights::dim",
                    "name": "dim",
                    "assembly": "game",
                    "parameters": [{
                        "name": "level",
                        "internalName": "level",
                        "qualifiedTypeName": "i32",
                        "typeAssembly": "std",
                        "aliases": [],
                        "qualifiedName": "game_lights_dim_level"
                    }]
                }]
            })
        );

        let back = Manifest::from_document(&manifest.to_document().expect("doc")).expect("parse");
        assert_eq!(back, manifest);
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let manifest =
            Manifest::from_document(r#"{"id":"a","version":"1","domain":"d"}"#).expect("parse");
        assert!(manifest.entities.is_empty());
        assert!(manifest.actions.is_empty());
        assert!(Manifest::from_document("{").is_err());
    }

    #[test]
    fn validate_reports_duplicates() {
        let mut manifest = Manifest::new("app", "1", "App");
        for id in ["a::X::go", "a::Y::go"] {
            manifest.actions.push(Action {
                id: id.to_string(),
                name: "go".to_string(),
                assembly: "a".to_string(),
                parameters: vec![parameter("same", "n"), parameter("other", "n")],
            });
        }

        let issues = manifest.validate();
        assert_eq!(
            issues,
            vec![
                ManifestIssue::DuplicateParameter {
                    action: "go".to_string(),
                    parameter: "n".to_string()
                },
                ManifestIssue::DuplicateQualifiedName("same_n".to_string()),
                ManifestIssue::DuplicateParameter {
                    action: "go".to_string(),
                    parameter: "n".to_string()
                },
                ManifestIssue::DuplicateQualifiedName("other_n".to_string()),
                ManifestIssue::DuplicateActionName {
                    name: "go".to_string(),
                    ids: vec!["a::X::go".to_string(), "a::Y::go".to_string()]
                },
            ]
        );
    }
}
