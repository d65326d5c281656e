//! Error taxonomy.
//!
//! Extraction and resolution problems are collected as issues and never
//! abort a pass. Dispatch problems are returned to the caller as
//! [`DispatchError`]. Everything else is a [`ConduitError`].

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type ConduitResult<T> = Result<T, ConduitError>;

/// Fatal library errors.
#[derive(Debug, Error)]
pub enum ConduitError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest document: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("Failed to parse config file {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Action not found: {0}")]
    NotFound(String),

    #[error("Action name '{name}' is declared by both {first} and {second}")]
    DuplicateAction {
        name: String,
        first: String,
        second: String,
    },

    #[error("Malformed intent event: {0}")]
    MalformedEvent(String),
}

/// Raised by a [`HandlerRegistry`](crate::registry::HandlerRegistry) that
/// cannot introspect one of its entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{type_name}: {reason}")]
pub struct RegistryError {
    pub type_name: String,
    pub reason: String,
}

impl RegistryError {
    pub fn new(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

/// Non-fatal problem found while extracting actions and entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionIssue {
    #[error("{callable} rejected: parameter '{parameter}' has unsupported type {type_name}")]
    UnsupportedParameterType {
        callable: String,
        parameter: String,
        type_name: String,
    },

    #[error("{callable} rejected: parameter '{parameter}' clashes with another after sanitizing")]
    DuplicateParameterName { callable: String, parameter: String },

    #[error("{callable} rejected: qualified name '{qualified_name}' is already taken")]
    DuplicateQualifiedName {
        callable: String,
        qualified_name: String,
    },

    #[error("Skipped entity {type_name}: {reason}")]
    EnumEnumerationFailure { type_name: String, reason: String },
}

/// Non-fatal problem found while resolving a manifest against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionIssue {
    #[error("Could not resolve action '{action}' ({id}): {reason}")]
    ActionResolutionFailure {
        action: String,
        id: String,
        reason: String,
    },

    #[error("Action name '{name}' kept for {kept}; {dropped} ignored")]
    DuplicateAction {
        name: String,
        kept: String,
        dropped: String,
    },
}

/// Why a single formal parameter could not be bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingFailureReason {
    /// A specialized parameter whose reserved key was not supplied.
    MissingSpecialized { key: String },
    /// No incoming value under any of the tried keys, and no default.
    NotFound { tried: Vec<String> },
    /// A value was found but does not convert to the declared type.
    Coercion { expected: String, found: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingFailure {
    pub parameter: String,
    pub reason: BindingFailureReason,
}

impl fmt::Display for BindingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            BindingFailureReason::MissingSpecialized { key } => {
                write!(f, "{}: no '{}' in dispatch context", self.parameter, key)
            }
            BindingFailureReason::NotFound { tried } => {
                write!(f, "{}: missing (tried {})", self.parameter, tried.join(", "))
            }
            BindingFailureReason::Coercion { expected, found } => write!(
                f,
                "{}: cannot convert {} to {}",
                self.parameter, found, expected
            ),
        }
    }
}

/// Every formal parameter of `action` that could not be satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot bind parameters of '{action}': {}", format_failures(.failures))]
pub struct ParameterBindingError {
    pub action: String,
    pub failures: Vec<BindingFailure>,
}

impl ParameterBindingError {
    pub fn failed_parameters(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.parameter.as_str()).collect()
    }
}

fn format_failures(failures: &[BindingFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Outcome of a failed dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown intent: {0}")]
    UnknownIntent(String),

    #[error("No intent recognized in '{text}'")]
    NoIntent { text: String },

    #[error(transparent)]
    ParameterBinding(#[from] ParameterBindingError),

    #[error("Invocation of '{action}' failed: {source}")]
    InvocationFailed {
        action: String,
        #[source]
        source: anyhow::Error,
    },
}
