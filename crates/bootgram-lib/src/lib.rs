#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Self-hosting LL(1) grammar engine.
//!
//! A grammar is written as text, one rule per line:
//!
//! ```text
//! Sum : Product SumTail { Arith.Tail.fold($1, $0); }
//! SumTail : '+' Product SumTail { Arith.Tail.prepend($2, "+", $1); }
//! SumTail : _empty_string_ { new Arith.Tail(); }
//! ```
//!
//! The text is read by a parser that this crate builds from its own engine
//! (see [`bootstrap`]). Actions call into native types registered in a
//! [`Registry`](bootgram_core::Registry), and the value of the start rule is
//! the result of a [`Parser::parse`].

pub mod bootstrap;
pub mod diagnostics;
mod parser;

#[cfg(test)]
mod test_utils;

pub use bootgram_core::{
    ExprTemplate, Grammar, GrammarBuilder, GrammarError, InvokeError, LexError, Lexer, Literal,
    Module, Registry, Token, Value, ValueKind,
};
pub use bootgram_engine::{Colors, Limits, ParseError, PrintTracer, Tracer, Verbosity};
pub use bootstrap::{GrammarDefinition, RuleDefinition, parse_definition};
pub use diagnostics::SourceDiagnostic;
pub use parser::Parser;

/// Errors from building or running a [`Parser`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Grammar text is malformed.
    #[error("invalid grammar text: {0}")]
    Syntax(SourceDiagnostic),

    /// Grammar text is well-formed but does not describe a usable grammar.
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The start rule produced a value of another type than requested.
    #[error("parse result is {found}, expected {expected}")]
    ResultType {
        expected: &'static str,
        found: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
