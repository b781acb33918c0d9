#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Backtracking recursive-descent engine for bootgram grammars.
//!
//! The engine walks a frozen [`bootgram_core::Grammar`] over a token slice,
//! evaluating each rule's action as soon as the rule matches.

mod colors;
pub mod engine;

#[cfg(test)]
mod test_utils;

pub use colors::Colors;
pub use engine::{Limits, NoopTracer, ParseError, PrintTracer, RdParser, Tracer, Verbosity};
