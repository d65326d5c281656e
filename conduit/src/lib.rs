// Conduit library
// Intent manifest extraction and dispatch for NLU-driven applications

// Core pipeline
pub mod registry;
pub mod extraction;
pub mod manifest;
pub mod parameters;
pub mod dispatch;

// Infrastructure
pub mod config;
pub mod error;
pub mod values;

// Utilities
pub mod utils;

pub use crate::config::{AppIdentity, ConduitConfig};
pub use crate::dispatch::{Dispatcher, IntentEvent};
pub use crate::error::{ConduitError, ConduitResult, DispatchError, ParameterBindingError};
pub use crate::extraction::{Extraction, Extractor};
pub use crate::manifest::{DuplicateActionPolicy, Manifest, ResolvedIndex};
pub use crate::parameters::{ParameterBag, ParameterProvider, SpecialParameters};
pub use crate::registry::{HandlerRegistry, StaticRegistry};
pub use crate::values::Value;
