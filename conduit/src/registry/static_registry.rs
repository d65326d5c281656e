use super::{CallableDescriptor, EnumDescriptor, Handler, HandlerRegistry, ResolvedCallable};
use crate::error::RegistryError;
use crate::values::Value;
use indexmap::IndexMap;
use std::sync::Arc;

/// Registration table populated by the host at start-up.
///
/// Entries keep registration order, which is the discovery order seen by
/// the extractor.
#[derive(Default)]
pub struct StaticRegistry {
    callables: IndexMap<String, ResolvedCallable>,
    enums: Vec<Result<EnumDescriptor, RegistryError>>,
}

impl StaticRegistry {
    pub fn builder() -> StaticRegistryBuilder {
        StaticRegistryBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.callables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callables.is_empty()
    }
}

impl HandlerRegistry for StaticRegistry {
    fn list_callables(&self) -> Vec<CallableDescriptor> {
        self.callables
            .values()
            .map(|c| c.descriptor.clone())
            .collect()
    }

    fn list_tagged_enum_types(&self) -> Vec<Result<EnumDescriptor, RegistryError>> {
        self.enums.clone()
    }

    fn resolve_callable(&self, declaring_type: &str, method: &str) -> Option<ResolvedCallable> {
        self.callables
            .get(&format!("{}::{}", declaring_type, method))
            .cloned()
    }
}

#[derive(Default)]
pub struct StaticRegistryBuilder {
    registry: StaticRegistry,
}

impl StaticRegistryBuilder {
    /// Register a callable. A later registration with the same locator
    /// replaces the earlier one in place.
    pub fn callable<F>(mut self, descriptor: CallableDescriptor, handler: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.insert(descriptor, Arc::new(handler));
        self
    }

    pub fn handler(mut self, descriptor: CallableDescriptor, handler: Arc<dyn Handler>) -> Self {
        self.insert(descriptor, handler);
        self
    }

    pub fn enumeration(mut self, descriptor: EnumDescriptor) -> Self {
        self.registry.enums.push(Ok(descriptor));
        self
    }

    /// Record a tagged enumeration whose values cannot be listed.
    pub fn broken_enumeration(
        mut self,
        type_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.registry
            .enums
            .push(Err(RegistryError::new(type_name, reason)));
        self
    }

    pub fn build(self) -> StaticRegistry {
        self.registry
    }

    fn insert(&mut self, descriptor: CallableDescriptor, handler: Arc<dyn Handler>) {
        let locator = descriptor.locator();
        if self.registry.callables.contains_key(&locator) {
            log::warn!("Replacing registered callable {}", locator);
        }
        self.registry
            .callables
            .insert(locator, ResolvedCallable::new(descriptor, handler));
    }
}
