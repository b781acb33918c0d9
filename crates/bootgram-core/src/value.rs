//! Runtime values produced by rule actions.
//!
//! Parse results, action arguments and action outputs are all `Value`s.
//! Native objects created by registered constructors live behind a shared,
//! interior-mutable cell so that side-effecting actions (e.g. appending to a
//! list that a later action returns) are visible through every copy.

use std::any::{Any, TypeId};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A dynamically typed value flowing through rule actions.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent payload (tokens without a value, ε slots).
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(Rc<str>),
    Object(Object),
}

impl Value {
    /// Wraps a native value into a shared object.
    pub fn object<T: Any>(value: T) -> Self {
        Self::Object(Object::new(value))
    }

    pub fn str(s: impl AsRef<str>) -> Self {
        Self::Str(Rc::from(s.as_ref()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Borrows the native payload if this is an object of type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<Ref<'_, T>> {
        self.as_object()?.borrow::<T>()
    }

    /// Mutably borrows the native payload if this is an object of type `T`.
    pub fn downcast_mut<T: Any>(&self) -> Option<RefMut<'_, T>> {
        self.as_object()?.borrow_mut::<T>()
    }

    /// Copies the value out as `T`.
    ///
    /// Primitives convert to their Rust counterparts (`bool`, `i64`, `f64`,
    /// `String`), objects are cloned out of their cell, and `T = Value`
    /// returns a copy of `self`.
    pub fn extract<T: Any + Clone>(&self) -> Option<T> {
        if let Some(v) = (self as &dyn Any).downcast_ref::<T>() {
            return Some(v.clone());
        }
        let any: &dyn Any = match self {
            Self::Null => return None,
            Self::Bool(b) => b,
            Self::Int(n) => n,
            Self::Double(d) => d,
            Self::Str(s) => {
                if let Some(v) = (s as &dyn Any).downcast_ref::<T>() {
                    return Some(v.clone());
                }
                let owned: Box<dyn Any> = Box::new(s.to_string());
                return owned.downcast::<T>().ok().map(|b| *b);
            }
            Self::Object(o) => return o.borrow::<T>().map(|r| r.clone()),
        };
        any.downcast_ref::<T>().cloned()
    }

    /// Human-readable name of the runtime type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::Str(_) => "string",
            Self::Object(o) => o.type_name(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Double(d) => write!(f, "{d:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Object(o) => write!(f, "<{}>", o.type_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(Rc::from(s))
    }
}

/// Shared handle to a native value.
///
/// Cloning the handle does not clone the payload; identity is pointer identity.
#[derive(Clone)]
pub struct Object {
    type_id: TypeId,
    type_name: &'static str,
    cell: Rc<RefCell<dyn Any>>,
}

impl Object {
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            cell: Rc::new(RefCell::new(value)),
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Returns `None` on type mismatch or if the payload is mutably borrowed.
    pub fn borrow<T: Any>(&self) -> Option<Ref<'_, T>> {
        if !self.is::<T>() {
            return None;
        }
        let cell = self.cell.try_borrow().ok()?;
        Ref::filter_map(cell, |any| any.downcast_ref::<T>()).ok()
    }

    /// Returns `None` on type mismatch or if the payload is already borrowed.
    pub fn borrow_mut<T: Any>(&self) -> Option<RefMut<'_, T>> {
        if !self.is::<T>() {
            return None;
        }
        let cell = self.cell.try_borrow_mut().ok()?;
        RefMut::filter_map(cell, |any| any.downcast_mut::<T>()).ok()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}
