//! Parameter support and binding.
//!
//! [`ParameterProvider`] decides which parameter types are bindable. The same
//! predicate is used by the extractor when building the manifest and by the
//! binder at dispatch time, so a callable that made it into the manifest is
//! always bindable in principle.

pub mod coercion;

pub use coercion::{coerce, CoercionError};

use crate::error::{BindingFailure, BindingFailureReason, ParameterBindingError};
use crate::manifest::{ManifestParameter, ResolvedAction};
use crate::registry::{ParameterDescriptor, ParameterType};
use crate::utils::sanitize_name;
use crate::values::Value;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Reserved key under which the raw NLU response is passed.
pub const RESPONSE_KEY: &str = "@response";
/// Reserved key for the host's current session object.
pub const SESSION_KEY: &str = "@session";

/// Type name of the raw response object bound under [`RESPONSE_KEY`].
pub const RESPONSE_TYPE_NAME: &str = "serde_json::Value";

/// Named values extracted from a recognized intent. Keys are sanitized on
/// insertion so lookups ignore case and leading underscores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBag {
    values: HashMap<String, JsonValue>,
}

impl ParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<JsonValue>) {
        self.values.insert(sanitize_name(key), value.into());
    }

    pub fn with(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Non-null value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values
            .get(&sanitize_name(key))
            .filter(|v| !v.is_null())
    }

    pub fn from_json_object(object: &serde_json::Map<String, JsonValue>) -> Self {
        object
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl<'a> FromIterator<(&'a str, JsonValue)> for ParameterBag {
    fn from_iter<I: IntoIterator<Item = (&'a str, JsonValue)>>(iter: I) -> Self {
        let mut bag = ParameterBag::new();
        for (k, v) in iter {
            bag.insert(k, v);
        }
        bag
    }
}

/// Ambient objects for one dispatch, keyed by reserved key.
#[derive(Clone, Default)]
pub struct SpecialParameters {
    values: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl SpecialParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Arc::new(value));
    }

    pub fn insert_shared(&mut self, key: impl Into<String>, value: Arc<dyn Any + Send + Sync>) {
        self.values.insert(key.into(), value);
    }

    pub fn with<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl std::fmt::Debug for SpecialParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

/// Source of truth for what can be bound, and the binder itself.
#[derive(Debug, Clone)]
pub struct ParameterProvider {
    /// Specialized type name -> reserved key.
    specialized: IndexMap<String, String>,
}

impl Default for ParameterProvider {
    fn default() -> Self {
        Self::empty().with_specialized(RESPONSE_TYPE_NAME, RESPONSE_KEY)
    }
}

impl ParameterProvider {
    /// Provider with no specialized types at all.
    pub fn empty() -> Self {
        Self {
            specialized: IndexMap::new(),
        }
    }

    /// Bind parameters of type `type_name` from the reserved `key`.
    pub fn with_specialized(
        mut self,
        type_name: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        self.specialized.insert(type_name.into(), key.into());
        self
    }

    pub fn specialized_types(&self) -> impl Iterator<Item = (&str, &str)> {
        self.specialized
            .iter()
            .map(|(t, k)| (t.as_str(), k.as_str()))
    }

    /// Reserved key for a specialized parameter type.
    pub fn specialized_key(&self, parameter_type: &ParameterType) -> Option<&str> {
        match parameter_type {
            ParameterType::Object(name) => self.specialized.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn is_specialized(&self, parameter_type: &ParameterType) -> bool {
        self.specialized_key(parameter_type).is_some()
    }

    pub fn is_supported_parameter_type(&self, parameter_type: &ParameterType) -> bool {
        match parameter_type {
            ParameterType::Object(_) => self.is_specialized(parameter_type),
            _ => true,
        }
    }

    /// Bind every formal parameter of `action`'s callable, in declaration
    /// order. Failures are collected for all parameters before returning.
    pub fn bind(
        &self,
        action: &ResolvedAction,
        actuals: &ParameterBag,
        special: &SpecialParameters,
    ) -> Result<Vec<Value>, ParameterBindingError> {
        let formals = &action.callable.descriptor.parameters;
        let mut bound = Vec::with_capacity(formals.len());
        let mut failures = Vec::new();

        for formal in formals {
            let outcome = match self.specialized_key(&formal.parameter_type) {
                Some(key) => special
                    .get(key)
                    .map(|obj| Value::Object(Arc::clone(obj)))
                    .ok_or_else(|| BindingFailureReason::MissingSpecialized {
                        key: key.to_string(),
                    }),
                None => {
                    let keys = lookup_keys(formal, action.parameter(&formal.name));
                    bind_named(formal, &keys, actuals)
                }
            };

            match outcome {
                Ok(value) => bound.push(value),
                Err(reason) => failures.push(BindingFailure {
                    parameter: formal.name.clone(),
                    reason,
                }),
            }
        }

        if failures.is_empty() {
            Ok(bound)
        } else {
            log::debug!(
                "Binding failed for {}: {} of {} parameters unsatisfied",
                action.action.name,
                failures.len(),
                formals.len()
            );
            Err(ParameterBindingError {
                action: action.action.name.clone(),
                failures,
            })
        }
    }
}

/// Keys tried for a named parameter: name, aliases, then qualified name.
fn lookup_keys(formal: &ParameterDescriptor, entry: Option<&ManifestParameter>) -> Vec<String> {
    let mut keys: Vec<String> = match entry {
        Some(p) => std::iter::once(p.name.clone())
            .chain(p.aliases.iter().cloned())
            .chain(std::iter::once(p.qualified_name.clone()))
            .collect(),
        None => std::iter::once(&formal.name)
            .chain(formal.aliases.iter())
            .map(|k| sanitize_name(k))
            .collect(),
    };
    let mut seen = std::collections::HashSet::new();
    keys.retain(|k| seen.insert(k.clone()));
    keys
}

fn bind_named(
    formal: &ParameterDescriptor,
    keys: &[String],
    actuals: &ParameterBag,
) -> Result<Value, BindingFailureReason> {
    match keys.iter().find_map(|k| actuals.get(k)) {
        Some(raw) => coerce(raw, &formal.parameter_type).map_err(|e| {
            BindingFailureReason::Coercion {
                expected: e.expected,
                found: e.found,
            }
        }),
        None => formal
            .default
            .clone()
            .ok_or_else(|| BindingFailureReason::NotFound {
                tried: keys.to_vec(),
            }),
    }
}
