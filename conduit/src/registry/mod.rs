//! Handler registry: what the host application can be asked to do.
//!
//! A [`HandlerRegistry`] describes the callables and tagged enumerations of
//! the running process and hands out live handles for them. How the host
//! populates it (registration tables, generated code...) is irrelevant to
//! the rest of the crate as long as the descriptors are produced.

mod static_registry;

pub use static_registry::{StaticRegistry, StaticRegistryBuilder};

use crate::error::RegistryError;
use crate::values::Value;
use std::fmt;
use std::sync::Arc;

/// Declared type of a formal parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Char,
    String,
    Enum(EnumDescriptor),
    /// Any other type, by name. Bindable only when registered as specialized.
    Object(String),
}

/// Module that owns the built-in types.
pub const BUILTIN_MODULE: &str = "std";

impl ParameterType {
    pub fn object(type_name: impl Into<String>) -> Self {
        ParameterType::Object(type_name.into())
    }

    /// Short type name, as used in signatures.
    pub fn name(&self) -> &str {
        match self {
            ParameterType::Boolean => "bool",
            ParameterType::Int8 => "i8",
            ParameterType::Int16 => "i16",
            ParameterType::Int32 => "i32",
            ParameterType::Int64 => "i64",
            ParameterType::UInt8 => "u8",
            ParameterType::UInt16 => "u16",
            ParameterType::UInt32 => "u32",
            ParameterType::UInt64 => "u64",
            ParameterType::Float32 => "f32",
            ParameterType::Float64 => "f64",
            ParameterType::Char => "char",
            ParameterType::String => "String",
            ParameterType::Enum(e) => &e.type_name,
            ParameterType::Object(name) => name,
        }
    }

    /// Fully qualified type name, as written to the manifest.
    pub fn qualified_name(&self) -> String {
        match self {
            ParameterType::Enum(e) => e.qualified_name(),
            other => other.name().to_string(),
        }
    }

    /// Module owning the type; empty when unknown.
    pub fn owner(&self) -> &str {
        match self {
            ParameterType::Enum(e) => &e.module,
            ParameterType::Object(_) => "",
            _ => BUILTIN_MODULE,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ParameterType::Int8
                | ParameterType::Int16
                | ParameterType::Int32
                | ParameterType::Int64
                | ParameterType::UInt8
                | ParameterType::UInt16
                | ParameterType::UInt32
                | ParameterType::UInt64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ParameterType::Float32 | ParameterType::Float64)
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub parameter_type: ParameterType,
    pub aliases: Vec<String>,
    pub default: Option<Value>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, parameter_type: ParameterType) -> Self {
        Self {
            name: name.into(),
            parameter_type,
            aliases: Vec::new(),
            default: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// One callable application method.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableDescriptor {
    /// `::`-separated path of the declaring type.
    pub declaring_type: String,
    pub method: String,
    pub is_static: bool,
    /// Name of the return type; `()` when the callable returns nothing.
    pub return_type: String,
    pub parameters: Vec<ParameterDescriptor>,
    /// Module (crate, plugin...) the callable is compiled into.
    pub module: String,
    /// Whether the callable is tagged as an intent action.
    pub tagged: bool,
    /// Intent name declared on the tag, if any.
    pub intent: Option<String>,
}

impl CallableDescriptor {
    pub fn new(declaring_type: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            method: method.into(),
            is_static: false,
            return_type: "()".to_string(),
            parameters: Vec::new(),
            module: String::new(),
            tagged: false,
            intent: None,
        }
    }

    /// Mark as an action, optionally bound to an explicit intent name.
    pub fn action(mut self, intent: Option<&str>) -> Self {
        self.tagged = true;
        self.intent = intent.map(str::to_string);
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn returns(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = return_type.into();
        self
    }

    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Locator written as the action id: `{declaring_type}::{method}`.
    pub fn locator(&self) -> String {
        format!("{}::{}", self.declaring_type, self.method)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub aliases: Vec<String>,
}

impl EnumMember {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }
}

/// An enumeration exposed to the NLU service as an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub type_name: String,
    pub namespace: String,
    pub module: String,
    pub members: Vec<EnumMember>,
}

impl EnumDescriptor {
    pub fn new(type_name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            namespace: namespace.into(),
            module: String::new(),
            members: Vec::new(),
        }
    }

    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn with_member(mut self, member: EnumMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.type_name.clone()
        } else {
            format!("{}::{}", self.namespace, self.type_name)
        }
    }

    /// Find a member by name or alias, ignoring case.
    pub fn find_member(&self, text: &str) -> Option<&EnumMember> {
        let text = text.trim();
        self.members
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(text))
            .or_else(|| {
                self.members
                    .iter()
                    .find(|m| m.aliases.iter().any(|a| a.eq_ignore_ascii_case(text)))
            })
    }
}

/// Something that can be invoked with bound arguments.
pub trait Handler: Send + Sync {
    fn invoke(&self, args: &[Value]) -> anyhow::Result<Value>;
}

impl<F> Handler for F
where
    F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync,
{
    fn invoke(&self, args: &[Value]) -> anyhow::Result<Value> {
        self(args)
    }
}

/// A live callable: its descriptor plus the handle to invoke it.
#[derive(Clone)]
pub struct ResolvedCallable {
    pub descriptor: CallableDescriptor,
    pub handler: Arc<dyn Handler>,
}

impl ResolvedCallable {
    pub fn new(descriptor: CallableDescriptor, handler: Arc<dyn Handler>) -> Self {
        Self {
            descriptor,
            handler,
        }
    }

    pub fn invoke(&self, args: &[Value]) -> anyhow::Result<Value> {
        self.handler.invoke(args)
    }
}

impl fmt::Debug for ResolvedCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedCallable")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

/// Read-only introspection over the host's callables and enumerations.
pub trait HandlerRegistry: Send + Sync {
    /// Every callable known to the host, tagged or not, in discovery order.
    fn list_callables(&self) -> Vec<CallableDescriptor>;

    /// Tagged enumerations in discovery order. An `Err` entry is an
    /// enumeration whose values could not be listed.
    fn list_tagged_enum_types(&self) -> Vec<Result<EnumDescriptor, RegistryError>>;

    /// Live handle for `declaring_type::method`, if the host still has it.
    fn resolve_callable(&self, declaring_type: &str, method: &str) -> Option<ResolvedCallable>;
}
