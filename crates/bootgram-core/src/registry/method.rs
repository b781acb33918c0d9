//! Callables and overload selection.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::Value;

use super::{CallError, ResolveError};

/// Declared kind of a parameter or of a type's runtime representation.
#[derive(Clone, Copy, Debug)]
pub enum ValueKind {
    /// Accepts anything, including `Null`.
    Any,
    Bool,
    Int,
    Double,
    Str,
    /// A native object of one Rust type.
    Native { id: TypeId, name: &'static str },
}

impl ValueKind {
    pub fn native<T: Any>() -> Self {
        Self::Native {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Runtime kind of an argument. `Null` degrades to the `Any` wildcard.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Any,
            Value::Bool(_) => Self::Bool,
            Value::Int(_) => Self::Int,
            Value::Double(_) => Self::Double,
            Value::Str(_) => Self::Str,
            Value::Object(o) => Self::Native {
                id: o.type_id(),
                name: o.type_name(),
            },
        }
    }

    /// Whether a value of runtime kind `arg` may bind to a parameter of kind `self`.
    ///
    /// A wildcard argument (from `Null`) binds to `Any` and to native parameters.
    pub fn accepts(self, arg: ValueKind) -> bool {
        match (self, arg) {
            (Self::Any, _) => true,
            (Self::Native { .. }, Self::Any) => true,
            (param, arg) => param == arg,
        }
    }

    /// Whether `value` is assignment-compatible with this kind.
    pub fn admits(self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            _ => !value.is_null() && self.accepts(ValueKind::of(value)),
        }
    }
}

impl PartialEq for ValueKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Native { id: a, .. }, Self::Native { id: b, .. }) => a == b,
            (Self::Any, Self::Any)
            | (Self::Bool, Self::Bool)
            | (Self::Int, Self::Int)
            | (Self::Double, Self::Double)
            | (Self::Str, Self::Str) => true,
            _ => false,
        }
    }
}

impl Eq for ValueKind {}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Double => write!(f, "double"),
            Self::Str => write!(f, "string"),
            Self::Native { name, .. } => write!(f, "{name}"),
        }
    }
}

/// Failure raised by a native callable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvokeError {
    #[error("argument {index} is not {expected}")]
    Argument { index: usize, expected: &'static str },

    #[error("receiver is not {expected}")]
    Receiver { expected: &'static str },

    #[error("{0}")]
    Failed(String),
}

impl InvokeError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Positional arguments handed to a native callable.
#[derive(Clone, Copy)]
pub struct Args<'a> {
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub fn new(values: &'a [Value]) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    pub fn get(&self, index: usize) -> Result<&'a Value, InvokeError> {
        self.values.get(index).ok_or(InvokeError::Argument {
            index,
            expected: "present",
        })
    }

    pub fn int(&self, index: usize) -> Result<i64, InvokeError> {
        self.get(index)?.as_int().ok_or(InvokeError::Argument {
            index,
            expected: "an int",
        })
    }

    pub fn double(&self, index: usize) -> Result<f64, InvokeError> {
        self.get(index)?.as_double().ok_or(InvokeError::Argument {
            index,
            expected: "a double",
        })
    }

    pub fn bool(&self, index: usize) -> Result<bool, InvokeError> {
        self.get(index)?.as_bool().ok_or(InvokeError::Argument {
            index,
            expected: "a bool",
        })
    }

    pub fn str(&self, index: usize) -> Result<&'a str, InvokeError> {
        self.get(index)?.as_str().ok_or(InvokeError::Argument {
            index,
            expected: "a string",
        })
    }

    /// Copies argument `index` out as `T` (see [`Value::extract`]).
    pub fn extract<T: Any + Clone>(&self, index: usize) -> Result<T, InvokeError> {
        self.get(index)?.extract::<T>().ok_or(InvokeError::Argument {
            index,
            expected: std::any::type_name::<T>(),
        })
    }
}

pub type StaticFn = dyn Fn(&Args<'_>) -> Result<Value, InvokeError> + Send + Sync;
pub type InstanceFn = dyn Fn(&Value, &Args<'_>) -> Result<Value, InvokeError> + Send + Sync;

#[derive(Clone)]
pub(crate) enum Body {
    Static(Arc<StaticFn>),
    Instance(Arc<InstanceFn>),
}

/// One callable signature of a method group.
#[derive(Clone)]
pub struct Overload {
    params: Vec<ValueKind>,
    body: Body,
}

impl Overload {
    pub(crate) fn new(params: Vec<ValueKind>, body: Body) -> Self {
        Self { params, body }
    }

    pub fn params(&self) -> &[ValueKind] {
        &self.params
    }

    pub fn is_static(&self) -> bool {
        matches!(self.body, Body::Static(_))
    }

    fn accepts(&self, kinds: &[ValueKind]) -> bool {
        self.params.len() == kinds.len()
            && self.params.iter().zip(kinds).all(|(p, k)| p.accepts(*k))
    }

    fn is_exact(&self, kinds: &[ValueKind]) -> bool {
        self.params.as_slice() == kinds
    }

    /// Invokes the body. `context` must be present exactly for instance overloads.
    pub fn call(&self, context: Option<&Value>, args: &[Value]) -> Result<Value, InvokeError> {
        let args = Args::new(args);
        match (&self.body, context) {
            (Body::Static(f), None) => f(&args),
            (Body::Instance(f), Some(this)) => f(this, &args),
            (Body::Static(_), Some(_)) => {
                Err(InvokeError::failed("static overload called with a receiver"))
            }
            (Body::Instance(_), None) => Err(InvokeError::Receiver {
                expected: "present",
            }),
        }
    }
}

/// All overloads sharing one dotted name (a constructor set or a method).
#[derive(Clone)]
pub struct MethodGroup {
    name: Arc<str>,
    receiver: Option<ValueKind>,
    overloads: Vec<Overload>,
}

impl MethodGroup {
    pub(crate) fn new(name: &str, receiver: Option<ValueKind>) -> Self {
        Self {
            name: Arc::from(name),
            receiver,
            overloads: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, overload: Overload) {
        self.overloads.push(overload);
    }

    pub(crate) fn set_receiver(&mut self, receiver: Option<ValueKind>) {
        self.receiver = receiver;
    }

    /// Fully qualified name, e.g. `Arith.Tail.prepend`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runtime representation of the owning type, if it has one.
    pub fn receiver(&self) -> Option<ValueKind> {
        self.receiver
    }

    pub fn overloads(&self) -> &[Overload] {
        &self.overloads
    }

    pub fn is_empty(&self) -> bool {
        self.overloads.is_empty()
    }

    /// Whether any overload is static (`true`) or instance (`false`).
    pub fn has_overloads(&self, is_static: bool) -> bool {
        self.overloads.iter().any(|o| o.is_static() == is_static)
    }

    /// Picks the overload for the given argument kinds.
    ///
    /// `is_static` restricts the candidates to static or instance overloads.
    /// When several candidates accept the kinds, the unique exact match wins;
    /// otherwise the call is ambiguous.
    pub fn select(&self, is_static: bool, kinds: &[ValueKind]) -> Result<&Overload, ResolveError> {
        self.pick(
            self.overloads.iter().filter(|o| o.is_static() == is_static),
            kinds,
        )
    }

    /// Like [`select`](Self::select) but over static and instance overloads alike.
    pub fn select_any(&self, kinds: &[ValueKind]) -> Result<&Overload, ResolveError> {
        self.pick(self.overloads.iter(), kinds)
    }

    fn pick<'a>(
        &'a self,
        overloads: impl Iterator<Item = &'a Overload>,
        kinds: &[ValueKind],
    ) -> Result<&'a Overload, ResolveError> {
        let candidates: Vec<&Overload> = overloads.filter(|o| o.accepts(kinds)).collect();

        match candidates.as_slice() {
            [] => Err(ResolveError::NoMatchingOverload {
                name: self.name.to_string(),
                args: format_kinds(kinds),
            }),
            [only] => Ok(*only),
            _ => {
                let mut exact = candidates.iter().filter(|o| o.is_exact(kinds));
                match (exact.next(), exact.next()) {
                    (Some(o), None) => Ok(*o),
                    _ => Err(ResolveError::AmbiguousOverload {
                        name: self.name.to_string(),
                        args: format_kinds(kinds),
                        count: candidates.len(),
                    }),
                }
            }
        }
    }

    /// Selects by the runtime kinds of `args` and invokes.
    ///
    /// A receiver restricts the candidates to instance overloads, its absence
    /// to static ones.
    pub fn invoke(&self, context: Option<&Value>, args: &[Value]) -> Result<Value, CallError> {
        let kinds: Vec<ValueKind> = args.iter().map(ValueKind::of).collect();
        let overload = self.select(context.is_none(), &kinds)?;
        overload
            .call(context, args)
            .map_err(|source| CallError::Invoke {
                name: self.name.to_string(),
                source,
            })
    }
}

impl fmt::Debug for Overload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overload")
            .field("params", &self.params)
            .field("is_static", &self.is_static())
            .finish()
    }
}

impl fmt::Debug for MethodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodGroup")
            .field("name", &self.name)
            .field("overloads", &self.overloads.len())
            .finish()
    }
}

pub(crate) fn format_kinds(kinds: &[ValueKind]) -> String {
    kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
