//! Name resolution: dotted names to types, constructors and methods.
//!
//! A [`Registry`] is an ordered set of [`Module`]s populated ahead of time by
//! the embedding application. Rule actions refer to callables by dotted name
//! (`Arith.Addition`, `Arith.Tail.fold`); the registry maps those names to
//! Rust closures and picks an overload from the runtime kinds of the
//! evaluated arguments.
//!
//! Lookup order: modules in registration order, first match wins. Inside a
//! module the longest top-level type prefix is tried first, remaining
//! segments are nested types.

mod method;
mod module;
pub mod names;

#[cfg(test)]
mod names_tests;

use std::sync::Arc;

pub use method::{Args, InstanceFn, InvokeError, MethodGroup, Overload, StaticFn, ValueKind};
pub use module::{Module, TypeBuilder, TypeDef};
pub use names::check_format;

use crate::Value;

/// Failure to resolve a name or pick an overload.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("`{0}` is not a well-formed dotted name")]
    InvalidName(String),

    #[error("type `{0}` not found in any module")]
    TypeNotFound(String),

    #[error("method `{0}` not found")]
    MethodNotFound(String),

    #[error("type `{0}` has no constructors")]
    NoConstructor(String),

    #[error("no overload of `{name}` accepts ({args})")]
    NoMatchingOverload { name: String, args: String },

    #[error("call to `{name}` with ({args}) matches {count} overloads")]
    AmbiguousOverload {
        name: String,
        args: String,
        count: usize,
    },

    #[error("a registry needs at least one module")]
    NoModules,
}

/// Failure of a dynamic call: resolution or the callee itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CallError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("`{name}` failed: {source}")]
    Invoke {
        name: String,
        #[source]
        source: InvokeError,
    },
}

/// Ordered set of modules to resolve dotted names against.
#[derive(Debug, Clone)]
pub struct Registry {
    modules: Vec<Module>,
}

impl Registry {
    pub fn new(modules: impl IntoIterator<Item = Module>) -> Result<Self, ResolveError> {
        let modules: Vec<Module> = modules.into_iter().collect();
        if modules.is_empty() {
            return Err(ResolveError::NoModules);
        }
        Ok(Self { modules })
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn find_type(&self, full_name: &str) -> Result<&TypeDef, ResolveError> {
        if !check_format(full_name) {
            return Err(ResolveError::InvalidName(full_name.to_string()));
        }
        let segments: Vec<&str> = full_name.split('.').collect();
        self.modules
            .iter()
            .find_map(|m| m.find_type(&segments))
            .ok_or_else(|| ResolveError::TypeNotFound(full_name.to_string()))
    }

    /// Resolves `Owner.Path.method` to its overload set.
    pub fn find_method_group(&self, full_name: &str) -> Result<&Arc<MethodGroup>, ResolveError> {
        if !check_format(full_name) {
            return Err(ResolveError::InvalidName(full_name.to_string()));
        }
        let Some((owner, member)) = names::split_member(full_name) else {
            return Err(ResolveError::MethodNotFound(full_name.to_string()));
        };
        self.find_type(owner)?
            .method(member)
            .ok_or_else(|| ResolveError::MethodNotFound(full_name.to_string()))
    }

    /// Resolves a method and, if `arg_types` is given, one overload of it.
    ///
    /// Without `arg_types` the method must have exactly one overload.
    pub fn find_method(
        &self,
        full_name: &str,
        arg_types: Option<&[ValueKind]>,
    ) -> Result<&Overload, ResolveError> {
        let group = self.find_method_group(full_name)?;
        match arg_types {
            Some(kinds) => group.select_any(kinds),
            None => match group.overloads() {
                [only] => Ok(only),
                overloads => Err(ResolveError::AmbiguousOverload {
                    name: full_name.to_string(),
                    args: "unspecified".to_string(),
                    count: overloads.len(),
                }),
            },
        }
    }

    pub fn find_constructors(&self, type_name: &str) -> Result<&Arc<MethodGroup>, ResolveError> {
        let group = self.find_type(type_name)?.constructors();
        if group.is_empty() {
            return Err(ResolveError::NoConstructor(type_name.to_string()));
        }
        Ok(group)
    }

    pub fn find_constructor(
        &self,
        type_name: &str,
        arg_types: &[ValueKind],
    ) -> Result<&Overload, ResolveError> {
        self.find_constructors(type_name)?.select(true, arg_types)
    }

    /// Resolves by the runtime kinds of `args` and invokes.
    ///
    /// `context` is the receiver for instance methods and `None` for static ones.
    pub fn invoke_method(
        &self,
        full_name: &str,
        context: Option<&Value>,
        args: &[Value],
    ) -> Result<Value, CallError> {
        self.find_method_group(full_name)?.invoke(context, args)
    }

    pub fn invoke_constructor(&self, type_name: &str, args: &[Value]) -> Result<Value, CallError> {
        self.find_constructors(type_name)?.invoke(None, args)
    }
}
