//! Staging area for grammars.
//!
//! Rules are recorded by name and may reference symbols that are registered
//! later. Everything is resolved at once in [`GrammarBuilder::build`].

use indexmap::IndexMap;

use crate::Token;
use crate::action::{ExprTemplate, RuleAction};
use crate::registry::Registry;

use super::{
    EMPTY_STRING, Grammar, GrammarError, NonTerminal, NonTerminalDef, Rule, Symbol, Terminal,
    TerminalId,
};

#[derive(Debug, Clone)]
struct StagedRule {
    symbols: Vec<String>,
    action: Vec<ExprTemplate>,
}

/// Collects terminals, non-terminals and rules, then builds a [`Grammar`].
///
/// The first non-terminal registered is the start symbol unless
/// [`set_start`](Self::set_start) names another one.
#[derive(Debug, Clone)]
pub struct GrammarBuilder<Tok> {
    /// Index is the terminal id. ε sits at index 0 without a token.
    terminals: IndexMap<String, Option<Tok>>,
    /// Index is the non-terminal handle.
    nonterminals: IndexMap<String, Vec<StagedRule>>,
    start: Option<String>,
}

impl<Tok: Token> Default for GrammarBuilder<Tok> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tok: Token> GrammarBuilder<Tok> {
    pub fn new() -> Self {
        let mut terminals = IndexMap::new();
        terminals.insert(EMPTY_STRING.to_string(), None);
        Self {
            terminals,
            nonterminals: IndexMap::new(),
            start: None,
        }
    }

    /// Registers a terminal matched by tokens compatible with `token`.
    pub fn register_terminal(
        &mut self,
        name: impl Into<String>,
        token: Tok,
    ) -> Result<TerminalId, GrammarError> {
        let name = name.into();
        if self.terminals.contains_key(&name) {
            return Err(GrammarError::DuplicateTerminal(name));
        }
        if self.nonterminals.contains_key(&name) {
            return Err(GrammarError::NameConflict(name));
        }

        let existing = self.terminals.iter().find(|(_, existing)| {
            existing
                .as_ref()
                .is_some_and(|t| t.is_compatible(&token) || token.is_compatible(t))
        });
        if let Some((existing, _)) = existing {
            return Err(GrammarError::DuplicateToken {
                name,
                existing: existing.clone(),
            });
        }

        let (index, _) = self.terminals.insert_full(name, Some(token));
        Ok(TerminalId::from_raw(index as u32))
    }

    /// Registers a non-terminal, or returns the handle of an existing one.
    pub fn register_nonterminal(
        &mut self,
        name: impl Into<String>,
    ) -> Result<NonTerminal, GrammarError> {
        let name = name.into();
        if self.terminals.contains_key(&name) {
            return Err(GrammarError::NameConflict(name));
        }
        let entry = self.nonterminals.entry(name);
        let index = entry.index();
        entry.or_default();
        Ok(NonTerminal::from_raw(index as u32))
    }

    /// Adds `nonterminal : symbols { action }`, registering `nonterminal` if needed.
    ///
    /// Symbols are names of terminals or non-terminals and are looked up at
    /// build time. `_empty_string_` stands for ε. Rules sharing a right-hand
    /// side are kept apart; the engine reports them as ambiguous.
    pub fn register_rule<S>(
        &mut self,
        nonterminal: &str,
        symbols: impl IntoIterator<Item = S>,
        action: Vec<ExprTemplate>,
    ) -> Result<(), GrammarError>
    where
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        if symbols.is_empty() {
            return Err(GrammarError::EmptyRule(nonterminal.to_string()));
        }
        if action.is_empty() {
            return Err(GrammarError::EmptyAction(nonterminal.to_string()));
        }

        let nt = self.register_nonterminal(nonterminal)?;
        self.nonterminals[nt.as_u32() as usize].push(StagedRule { symbols, action });
        Ok(())
    }

    /// Overrides the start symbol. Checked against the non-terminals at build time.
    pub fn set_start(&mut self, name: impl Into<String>) -> Result<(), GrammarError> {
        let name = name.into();
        if self.terminals.contains_key(&name) {
            return Err(GrammarError::NameConflict(name));
        }
        self.start = Some(name);
        Ok(())
    }

    pub fn has_nonterminal(&self, name: &str) -> bool {
        self.nonterminals.contains_key(name)
    }

    pub fn has_terminal(&self, name: &str) -> bool {
        self.terminals.contains_key(name)
    }

    /// Resolves every symbol and action and freezes the grammar.
    pub fn build(self, registry: &Registry) -> Result<Grammar<Tok>, GrammarError> {
        let Some((first, _)) = self.nonterminals.first() else {
            return Err(GrammarError::EmptyGrammar);
        };
        let start_name = self.start.as_deref().unwrap_or(first);
        let Some(start) = self.nonterminals.get_index_of(start_name) else {
            return Err(GrammarError::UndefinedStart(start_name.to_string()));
        };

        let mut nonterminals = Vec::with_capacity(self.nonterminals.len());
        for (name, staged) in &self.nonterminals {
            if staged.is_empty() {
                return Err(GrammarError::NoRules(name.clone()));
            }
            let rules = staged
                .iter()
                .map(|rule| self.finish_rule(name, rule, registry))
                .collect::<Result<Vec<_>, _>>()?;
            nonterminals.push(NonTerminalDef {
                name: name.clone(),
                rules,
            });
        }

        let terminals = self
            .terminals
            .into_iter()
            .map(|(name, token)| Terminal { name, token })
            .collect();

        Ok(Grammar {
            terminals,
            nonterminals,
            start: NonTerminal::from_raw(start as u32),
        })
    }

    fn finish_rule(
        &self,
        nonterminal: &str,
        rule: &StagedRule,
        registry: &Registry,
    ) -> Result<Rule, GrammarError> {
        let symbols = rule
            .symbols
            .iter()
            .map(|name| self.lookup_symbol(nonterminal, name))
            .collect::<Result<Vec<_>, _>>()?;

        let exprs = rule
            .action
            .iter()
            .map(|expr| expr.resolve(registry))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| GrammarError::Resolve {
                nonterminal: nonterminal.to_string(),
                source,
            })?;

        Ok(Rule {
            symbols,
            action: RuleAction::new(exprs),
        })
    }

    fn lookup_symbol(&self, nonterminal: &str, name: &str) -> Result<Symbol, GrammarError> {
        if let Some(index) = self.terminals.get_index_of(name) {
            return Ok(Symbol::Terminal(TerminalId::from_raw(index as u32)));
        }
        if let Some(index) = self.nonterminals.get_index_of(name) {
            return Ok(Symbol::NonTerminal(NonTerminal::from_raw(index as u32)));
        }
        Err(GrammarError::UndefinedSymbol {
            nonterminal: nonterminal.to_string(),
            symbol: name.to_string(),
        })
    }
}
