//! Intent dispatch.
//!
//! A [`Dispatcher`] owns a resolved index and the parameter provider. Both
//! are read-only, so a single dispatcher can serve concurrent calls.

mod event;

pub use event::IntentEvent;

use crate::error::{ConduitResult, DispatchError};
use crate::manifest::{DuplicateActionPolicy, Manifest, ResolvedIndex};
use crate::parameters::{
    ParameterBag, ParameterProvider, SpecialParameters, RESPONSE_KEY, RESPONSE_TYPE_NAME,
};
use crate::registry::{HandlerRegistry, ParameterType};
use crate::values::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Dispatcher {
    index: ResolvedIndex,
    provider: ParameterProvider,
}

impl Dispatcher {
    pub fn new(index: ResolvedIndex, provider: ParameterProvider) -> Self {
        Self { index, provider }
    }

    /// Resolve `manifest` against `registry` and wrap the result.
    pub fn from_manifest(
        manifest: &Manifest,
        registry: &dyn HandlerRegistry,
        provider: ParameterProvider,
        policy: DuplicateActionPolicy,
    ) -> ConduitResult<Self> {
        let index = ResolvedIndex::resolve(manifest, registry, &provider, policy)?;
        Ok(Self::new(index, provider))
    }

    pub fn index(&self) -> &ResolvedIndex {
        &self.index
    }

    pub fn provider(&self) -> &ParameterProvider {
        &self.provider
    }

    pub fn contains_action(&self, intent: &str) -> bool {
        self.index.contains_action(intent)
    }

    /// Bind and invoke the action registered for `intent`.
    ///
    /// The handler runs at most once, and only when every parameter bound.
    /// Handler errors and panics come back as
    /// [`DispatchError::InvocationFailed`].
    pub fn dispatch(
        &self,
        intent: &str,
        actuals: &ParameterBag,
        special: &SpecialParameters,
    ) -> Result<Value, DispatchError> {
        let action = self.index.get(intent).ok_or_else(|| {
            log::debug!("No action for intent '{}'", intent);
            DispatchError::UnknownIntent(intent.to_string())
        })?;

        let args = self.provider.bind(action, actuals, special)?;
        log::debug!(
            "Invoking {} for intent '{}' with {} arguments",
            action.action.id,
            intent,
            args.len()
        );

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| action.callable.invoke(&args)))
            .unwrap_or_else(|payload| {
                Err(anyhow::anyhow!(
                    "handler panicked: {}",
                    panic_message(payload.as_ref())
                ))
            });

        outcome.map_err(|source| {
            log::debug!("Action {} failed: {:#}", action.action.id, source);
            DispatchError::InvocationFailed {
                action: action.action.name.clone(),
                source,
            }
        })
    }

    /// Dispatch the top intent of a parsed NLU response. The raw response
    /// is made available to handlers under the response key.
    pub fn dispatch_event(
        &self,
        event: &IntentEvent,
        mut special: SpecialParameters,
    ) -> Result<Value, DispatchError> {
        let intent = event.intent.as_deref().ok_or_else(|| DispatchError::NoIntent {
            text: event.text.clone(),
        })?;

        let key = self
            .provider
            .specialized_key(&ParameterType::object(RESPONSE_TYPE_NAME))
            .unwrap_or(RESPONSE_KEY)
            .to_string();
        special.insert_shared(key, Arc::new(event.response.clone()));

        self.dispatch(intent, &event.parameters, &special)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
