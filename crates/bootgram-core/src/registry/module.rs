//! Modules: named collections of types and their members.

use std::any::Any;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::Value;
use crate::invariants::ensure_well_formed_name;

use super::method::{Args, Body, InstanceFn, InvokeError, MethodGroup, Overload, StaticFn, ValueKind};

/// A registered type: constructors, methods and nested types.
#[derive(Debug, Clone)]
pub struct TypeDef {
    name: String,
    repr: Option<ValueKind>,
    constructors: Arc<MethodGroup>,
    methods: IndexMap<String, Arc<MethodGroup>>,
    nested: IndexMap<String, usize>,
}

impl TypeDef {
    fn new(name: String) -> Self {
        Self {
            constructors: Arc::new(MethodGroup::new(&name, None)),
            name,
            repr: None,
            methods: IndexMap::new(),
            nested: IndexMap::new(),
        }
    }

    /// Fully qualified dotted name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runtime representation of instances, if the type has any.
    pub fn repr(&self) -> Option<ValueKind> {
        self.repr
    }

    pub fn constructors(&self) -> &Arc<MethodGroup> {
        &self.constructors
    }

    pub fn method(&self, name: &str) -> Option<&Arc<MethodGroup>> {
        self.methods.get(name)
    }
}

/// A loadable unit of types, looked up by dotted name.
///
/// Top-level types may have namespace-qualified names (`ns1.ns2.Type`);
/// nested types are reached through their parent (`ns1.ns2.Type.Inner`).
#[derive(Debug, Clone, Default)]
pub struct Module {
    name: String,
    types: Vec<TypeDef>,
    top_level: IndexMap<String, usize>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers (or reopens) a top-level type without a runtime representation.
    ///
    /// Such a type can only host constructors and static methods.
    pub fn add_type(&mut self, name: &str) -> TypeBuilder<'_> {
        ensure_well_formed_name(name);
        let index = match self.top_level.get(name) {
            Some(&index) => index,
            None => {
                let index = self.push_type(name.to_string());
                self.top_level.insert(name.to_string(), index);
                index
            }
        };
        TypeBuilder {
            module: self,
            index,
        }
    }

    /// Registers a top-level type whose instances are native `T` objects.
    pub fn add_native<T: Any>(&mut self, name: &str) -> TypeBuilder<'_> {
        self.add_type(name).repr(ValueKind::native::<T>())
    }

    /// Resolves `segments` as a top-level type followed by nested type names.
    ///
    /// The longest top-level prefix is tried first.
    pub(crate) fn find_type(&self, segments: &[&str]) -> Option<&TypeDef> {
        (1..=segments.len()).rev().find_map(|split| {
            let top = segments[..split].join(".");
            let mut index = *self.top_level.get(&top)?;
            for nested in &segments[split..] {
                index = *self.types[index].nested.get(*nested)?;
            }
            Some(&self.types[index])
        })
    }

    fn push_type(&mut self, name: String) -> usize {
        self.types.push(TypeDef::new(name));
        self.types.len() - 1
    }
}

/// Builder-style registration of one type's members.
pub struct TypeBuilder<'m> {
    module: &'m mut Module,
    index: usize,
}

impl<'m> TypeBuilder<'m> {
    fn def(&mut self) -> &mut TypeDef {
        &mut self.module.types[self.index]
    }

    /// Sets the runtime representation used to type-check instance-call receivers.
    pub fn repr(mut self, kind: ValueKind) -> Self {
        let def = self.def();
        def.repr = Some(kind);
        for group in def.methods.values_mut() {
            Arc::make_mut(group).set_receiver(Some(kind));
        }
        self
    }

    pub fn constructor<F>(mut self, params: &[ValueKind], f: F) -> Self
    where
        F: Fn(&Args<'_>) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        let body: Arc<StaticFn> = Arc::new(f);
        Arc::make_mut(&mut self.def().constructors)
            .push(Overload::new(params.to_vec(), Body::Static(body)));
        self
    }

    pub fn static_method<F>(mut self, name: &str, params: &[ValueKind], f: F) -> Self
    where
        F: Fn(&Args<'_>) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        let body: Arc<StaticFn> = Arc::new(f);
        self.push_method(name, Overload::new(params.to_vec(), Body::Static(body)));
        self
    }

    /// Registers an instance method; `f` receives the receiver first.
    pub fn method<F>(mut self, name: &str, params: &[ValueKind], f: F) -> Self
    where
        F: Fn(&Value, &Args<'_>) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        let body: Arc<InstanceFn> = Arc::new(f);
        self.push_method(name, Overload::new(params.to_vec(), Body::Instance(body)));
        self
    }

    /// Registers (or reopens) a nested type and configures it with `f`.
    pub fn nested(mut self, name: &str, f: impl FnOnce(TypeBuilder<'_>)) -> Self {
        ensure_well_formed_name(name);
        let existing = self.def().nested.get(name).copied();
        let index = match existing {
            Some(index) => index,
            None => {
                let full = format!("{}.{}", self.def().name, name);
                let index = self.module.push_type(full);
                self.def().nested.insert(name.to_string(), index);
                index
            }
        };
        f(TypeBuilder {
            module: &mut *self.module,
            index,
        });
        self
    }

    fn push_method(&mut self, name: &str, overload: Overload) {
        ensure_well_formed_name(name);
        let def = self.def();
        let full = format!("{}.{}", def.name, name);
        let receiver = def.repr;
        let group = def
            .methods
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MethodGroup::new(&full, receiver)));
        Arc::make_mut(group).push(overload);
    }
}
