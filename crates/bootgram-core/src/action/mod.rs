//! Rule actions: expressions evaluated over a rule's parse results.
//!
//! Two forms exist:
//! - [`ExprTemplate`]: names only, as written in grammar text. Produced while
//!   a grammar is staged and independent of any registry.
//! - [`RuleExpression`]: names bound to method groups of a [`Registry`],
//!   produced by [`ExprTemplate::resolve`] when the grammar is built.
//!
//! Overloads are still picked per call, from the runtime kinds of the
//! evaluated arguments.

mod eval;


use std::fmt;
use std::sync::Arc;

pub use eval::{EvalError, evaluate};

use crate::Value;
use crate::registry::{MethodGroup, Registry, ResolveError};

/// A constant written in grammar text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Double(f64),
    Str(Arc<str>),
}

impl Literal {
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(n) => Value::Int(*n),
            Self::Double(d) => Value::Double(*d),
            Self::Str(s) => Value::str(s),
        }
    }

    /// Converts a primitive payload; `None` for nulls, bools and objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(n) => Some(Self::Int(*n)),
            Value::Double(d) => Some(Self::Double(*d)),
            Value::Str(s) => Some(Self::Str(Arc::from(&**s))),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Double(d) => write!(f, "{d:?}"),
            Self::Str(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
        }
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Literal {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Self::Str(Arc::from(s))
    }
}

/// An unresolved action expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprTemplate {
    Constant(Literal),
    /// `$index`: the parse result of the rule's `index`-th symbol.
    Variable(usize),
    /// `new Type.Name(args)`
    Construct {
        type_name: String,
        args: Vec<ExprTemplate>,
    },
    /// `static Type.method(args)`
    StaticCall {
        method: String,
        args: Vec<ExprTemplate>,
    },
    /// `Type.method(context, args)`
    InstanceCall {
        method: String,
        context: Box<ExprTemplate>,
        args: Vec<ExprTemplate>,
    },
}

impl ExprTemplate {
    pub fn constant(literal: impl Into<Literal>) -> Self {
        Self::Constant(literal.into())
    }

    pub fn variable(index: usize) -> Self {
        Self::Variable(index)
    }

    pub fn construct(type_name: impl Into<String>, args: Vec<ExprTemplate>) -> Self {
        Self::Construct {
            type_name: type_name.into(),
            args,
        }
    }

    pub fn call(method: impl Into<String>, args: Vec<ExprTemplate>) -> Self {
        Self::StaticCall {
            method: method.into(),
            args,
        }
    }

    pub fn invoke(method: impl Into<String>, context: ExprTemplate, args: Vec<ExprTemplate>) -> Self {
        Self::InstanceCall {
            method: method.into(),
            context: Box::new(context),
            args,
        }
    }

    /// Binds every name in the tree to a method group of `registry`.
    pub fn resolve(&self, registry: &Registry) -> Result<RuleExpression, ResolveError> {
        let resolve_all = |args: &[ExprTemplate]| -> Result<Vec<RuleExpression>, ResolveError> {
            args.iter().map(|a| a.resolve(registry)).collect()
        };

        Ok(match self {
            Self::Constant(literal) => RuleExpression::Constant(literal.clone()),
            Self::Variable(index) => RuleExpression::Variable(*index),
            Self::Construct { type_name, args } => RuleExpression::ConstructorCall {
                constructors: Arc::clone(registry.find_constructors(type_name)?),
                args: resolve_all(args)?,
            },
            Self::StaticCall { method, args } => RuleExpression::StaticCall {
                method: Arc::clone(find_group(registry, method, true)?),
                args: resolve_all(args)?,
            },
            Self::InstanceCall {
                method,
                context,
                args,
            } => RuleExpression::InstanceCall {
                method: Arc::clone(find_group(registry, method, false)?),
                context: Box::new(context.resolve(registry)?),
                args: resolve_all(args)?,
            },
        })
    }
}

/// A method called in static form needs a static overload, and likewise for instances.
fn find_group<'r>(
    registry: &'r Registry,
    method: &str,
    is_static: bool,
) -> Result<&'r Arc<MethodGroup>, ResolveError> {
    let group = registry.find_method_group(method)?;
    if !group.has_overloads(is_static) {
        return Err(ResolveError::MethodNotFound(method.to_string()));
    }
    Ok(group)
}

impl fmt::Display for ExprTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(literal) => write!(f, "{literal}"),
            Self::Variable(index) => write!(f, "${index}"),
            Self::Construct { type_name, args } => {
                write!(f, "new {type_name}(")?;
                write_args(f, None::<&Self>, args)?;
                write!(f, ")")
            }
            Self::StaticCall { method, args } => {
                write!(f, "static {method}(")?;
                write_args(f, None::<&Self>, args)?;
                write!(f, ")")
            }
            Self::InstanceCall {
                method,
                context,
                args,
            } => {
                write!(f, "{method}(")?;
                write_args(f, Some(&**context), args)?;
                write!(f, ")")
            }
        }
    }
}

/// A resolved action expression.
#[derive(Debug, Clone)]
pub enum RuleExpression {
    Constant(Literal),
    Variable(usize),
    ConstructorCall {
        constructors: Arc<MethodGroup>,
        args: Vec<RuleExpression>,
    },
    StaticCall {
        method: Arc<MethodGroup>,
        args: Vec<RuleExpression>,
    },
    InstanceCall {
        method: Arc<MethodGroup>,
        context: Box<RuleExpression>,
        args: Vec<RuleExpression>,
    },
}

impl fmt::Display for RuleExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(literal) => write!(f, "{literal}"),
            Self::Variable(index) => write!(f, "${index}"),
            Self::ConstructorCall { constructors, args } => {
                write!(f, "new {}(", constructors.name())?;
                write_args(f, None::<&Self>, args)?;
                write!(f, ")")
            }
            Self::StaticCall { method, args } => {
                write!(f, "static {}(", method.name())?;
                write_args(f, None::<&Self>, args)?;
                write!(f, ")")
            }
            Self::InstanceCall {
                method,
                context,
                args,
            } => {
                write!(f, "{}(", method.name())?;
                write_args(f, Some(&**context), args)?;
                write!(f, ")")
            }
        }
    }
}

fn write_args<E: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    context: Option<&E>,
    args: &[E],
) -> fmt::Result {
    let mut first = true;
    for arg in context.into_iter().chain(args) {
        if !first {
            write!(f, ", ")?;
        }
        first = false;
        write!(f, "{arg}")?;
    }
    Ok(())
}

/// The expressions run after a rule matched. The last one yields the rule's value.
#[derive(Debug, Clone)]
pub struct RuleAction {
    exprs: Vec<RuleExpression>,
}

impl RuleAction {
    pub(crate) fn new(exprs: Vec<RuleExpression>) -> Self {
        Self { exprs }
    }

    pub fn exprs(&self) -> &[RuleExpression] {
        &self.exprs
    }

    /// Evaluates every expression in order over `results`.
    ///
    /// Earlier expressions run for their side effects only. The last value
    /// must not be `Null`.
    pub fn evaluate(&self, results: &[Value]) -> Result<Value, EvalError> {
        let mut last = Value::Null;
        for expr in &self.exprs {
            last = evaluate(expr, results)?;
        }
        if last.is_null() {
            return Err(EvalError::NullResult);
        }
        Ok(last)
    }
}
