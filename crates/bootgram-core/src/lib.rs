#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Grammar model, name registry and rule actions for bootgram.
//!
//! Three layers:
//! - **Registry**: dotted names mapped to native constructors and methods
//! - **Actions**: expressions over parse results, resolved against a registry
//! - **Grammar**: terminals, non-terminals and rules, staged in a
//!   [`GrammarBuilder`] and frozen into a [`Grammar`]
//!
//! Parsing itself lives in `bootgram-engine`.

pub mod action;
pub mod grammar;
pub mod registry;

mod invariants;
mod token;
mod value;

#[cfg(test)]
mod test_utils;

pub use action::{EvalError, ExprTemplate, Literal, RuleAction, RuleExpression};
pub use grammar::{
    EMPTY_STRING, Grammar, GrammarBuilder, GrammarError, NonTerminal, Rule, Symbol, Terminal,
    TerminalId, check_left_recursion,
};
pub use registry::{
    Args, CallError, InvokeError, MethodGroup, Module, Registry, ResolveError, TypeBuilder,
    ValueKind,
};
pub use token::{LexError, Lexer, Token};
pub use value::{Object, Value};
