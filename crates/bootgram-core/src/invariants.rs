//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::grammar::{NonTerminal, TerminalId};
use crate::registry::check_format;

/// Registration names are chosen by the embedding code, not read from input.
pub(crate) fn ensure_well_formed_name(name: &str) {
    if !check_format(name) {
        panic!("Registry: `{name}` is not a well-formed dotted name");
    }
}

pub(crate) fn ensure_nonterminal(nt: NonTerminal, count: usize) -> usize {
    let index = nt.as_u32() as usize;
    if index >= count {
        panic!(
            "Grammar: non-terminal #{index} out of range ({count} declared; \
             handles must come from the same grammar)"
        );
    }
    index
}

pub(crate) fn ensure_terminal(id: TerminalId, count: usize) -> usize {
    let index = id.as_u32() as usize;
    if index >= count {
        panic!(
            "Grammar: terminal #{index} out of range ({count} declared; \
             handles must come from the same grammar)"
        );
    }
    index
}
