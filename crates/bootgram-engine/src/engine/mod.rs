//! Recursive-descent parsing over a frozen grammar.
//!
//! Each non-terminal tries all of its rules from the same position. A rule
//! either matches fully (its action runs and yields a value) or fails without
//! committing anything, and the cursor is reset for the next rule. More than
//! one matching rule is an ambiguity error; a rule consisting of ε alone is
//! the fallback when nothing else matched.

mod error;
mod parser;
mod trace;

#[cfg(test)]
mod engine_tests;

pub use error::ParseError;
pub use parser::{Limits, RdParser};
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
