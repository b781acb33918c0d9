//! Left-recursion detection.
//!
//! A recursive-descent parser loops forever on a non-terminal that can reach
//! itself without consuming input. The walk below follows every rule from its
//! leftmost symbol while the prefix so far can derive ε, and reports the first
//! non-terminal found on its own expansion path.

use indexmap::IndexSet;

use crate::Token;

use super::{Grammar, GrammarError, NonTerminal, Symbol};

/// Fails with [`GrammarError::LeftRecursion`] if any non-terminal is left-recursive.
///
/// The start symbol is examined first, then the remaining non-terminals in
/// declaration order, so unreachable ones are checked as well.
pub fn check_left_recursion<Tok: Token>(grammar: &Grammar<Tok>) -> Result<(), GrammarError> {
    let mut walk = Walk {
        grammar,
        nullable: vec![None; grammar.nonterminals.len()],
        path: IndexSet::new(),
    };
    walk.visit(grammar.start())?;
    for nt in grammar.nonterminals() {
        walk.visit(nt)?;
    }
    Ok(())
}

struct Walk<'g, Tok> {
    grammar: &'g Grammar<Tok>,
    /// Memoized "can derive ε" per non-terminal.
    nullable: Vec<Option<bool>>,
    /// Non-terminals currently being expanded, outermost first.
    path: IndexSet<NonTerminal>,
}

impl<Tok: Token> Walk<'_, Tok> {
    fn visit(&mut self, nt: NonTerminal) -> Result<bool, GrammarError> {
        if let Some(known) = self.nullable[nt.as_u32() as usize] {
            return Ok(known);
        }
        if let Some(at) = self.path.get_index_of(&nt) {
            return Err(self.cycle_error(at, nt));
        }

        self.path.insert(nt);
        let mut nullable = false;
        // No short-circuit: every rule's left edge must be walked.
        for rule in self.grammar.rules(nt) {
            nullable |= self.walk_prefix(rule.symbols())?;
        }
        self.path.pop();

        self.nullable[nt.as_u32() as usize] = Some(nullable);
        Ok(nullable)
    }

    /// Visits symbols left to right while they derive ε. True if all of them do.
    fn walk_prefix(&mut self, symbols: &[Symbol]) -> Result<bool, GrammarError> {
        for &symbol in symbols {
            let nullable = match symbol {
                Symbol::Terminal(_) => symbol.is_empty_string(),
                Symbol::NonTerminal(nt) => self.visit(nt)?,
            };
            if !nullable {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn cycle_error(&self, at: usize, nt: NonTerminal) -> GrammarError {
        let mut names: Vec<&str> = self
            .path
            .iter()
            .skip(at)
            .map(|&n| self.grammar.nonterminal_name(n))
            .collect();
        names.push(self.grammar.nonterminal_name(nt));
        GrammarError::LeftRecursion {
            cycle: names.join(" -> "),
        }
    }
}
