//! Grammar text rendering.
//!
//! The output uses the same notation the bootstrap grammar reads, one rule per
//! line, start symbol first.

use crate::Token;

use super::{Grammar, NonTerminal, Rule};

impl<Tok: Token> Grammar<Tok> {
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let start = self.start();
        let order = std::iter::once(start).chain(self.nonterminals().filter(|&nt| nt != start));
        for nt in order {
            for rule in self.rules(nt) {
                self.write_rule(&mut out, nt, rule);
            }
        }
        out
    }

    /// `Name : sym sym`, the rule without its action.
    pub fn production(&self, nt: NonTerminal, rule: &Rule) -> String {
        let mut out = String::new();
        self.write_production(&mut out, nt, rule);
        out
    }

    fn write_production(&self, out: &mut String, nt: NonTerminal, rule: &Rule) {
        out.push_str(self.nonterminal_name(nt));
        out.push_str(" :");
        for &symbol in rule.symbols() {
            out.push(' ');
            write_symbol(out, self.symbol_name(symbol));
        }
    }

    fn write_rule(&self, out: &mut String, nt: NonTerminal, rule: &Rule) {
        self.write_production(out, nt, rule);
        out.push_str(" {");
        for expr in rule.action().exprs() {
            out.push_str(&format!(" {expr};"));
        }
        out.push_str(" }\n");
    }
}

/// Names that are not identifiers are written as quoted single-character symbols.
fn write_symbol(out: &mut String, name: &str) {
    let mut chars = name.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric());
    if is_identifier {
        out.push_str(name);
    } else {
        out.push('\'');
        out.push_str(name);
        out.push('\'');
    }
}
