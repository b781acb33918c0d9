//! Grammar model: symbols, rules and the frozen [`Grammar`].
//!
//! Non-terminals and terminals are arena handles scoped to one grammar.
//! A `Grammar` is produced only by [`GrammarBuilder::build`], which checks
//! that every referenced symbol is defined and every non-terminal has rules.

mod builder;
mod dump;
mod recursion;

#[cfg(test)]
mod dump_tests;

pub use builder::GrammarBuilder;
pub use recursion::check_left_recursion;

use crate::Token;
use crate::action::RuleAction;
use crate::invariants::{ensure_nonterminal, ensure_terminal};
use crate::registry::ResolveError;

/// Reserved name of the empty-string terminal (ε).
pub const EMPTY_STRING: &str = "_empty_string_";

/// Handle to a non-terminal of one grammar.
///
/// Handles are only meaningful for the grammar (or builder) that issued them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NonTerminal(u32);

impl NonTerminal {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

/// Handle to a terminal of one grammar.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TerminalId(u32);

impl TerminalId {
    /// The ε terminal, present in every grammar.
    pub const EMPTY: TerminalId = TerminalId(0);

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Symbol {
    Terminal(TerminalId),
    NonTerminal(NonTerminal),
}

impl Symbol {
    pub fn is_empty_string(self) -> bool {
        self == Symbol::Terminal(TerminalId::EMPTY)
    }
}

/// A terminal: a name plus the reference token input tokens are matched against.
#[derive(Debug, Clone)]
pub struct Terminal<Tok> {
    name: String,
    /// `None` only for ε.
    token: Option<Tok>,
}

impl<Tok: Token> Terminal<Tok> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn token(&self) -> Option<&Tok> {
        self.token.as_ref()
    }

    pub fn is_empty_string(&self) -> bool {
        self.token.is_none()
    }

    /// Whether `input` is of this terminal's kind. ε matches no token.
    pub fn matches(&self, input: &Tok) -> bool {
        self.token.as_ref().is_some_and(|t| t.is_compatible(input))
    }
}

/// One production: a symbol sequence and the action run when it matches.
#[derive(Debug, Clone)]
pub struct Rule {
    symbols: Vec<Symbol>,
    action: RuleAction,
}

impl Rule {
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn action(&self) -> &RuleAction {
        &self.action
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// A rule consisting of ε alone. Its action receives no parse results.
    pub fn is_epsilon(&self) -> bool {
        matches!(self.symbols.as_slice(), [only] if only.is_empty_string())
    }
}

#[derive(Debug, Clone)]
struct NonTerminalDef {
    name: String,
    rules: Vec<Rule>,
}

/// An immutable grammar: terminals, non-terminals with their rules, and a start symbol.
#[derive(Debug, Clone)]
pub struct Grammar<Tok> {
    terminals: Vec<Terminal<Tok>>,
    nonterminals: Vec<NonTerminalDef>,
    start: NonTerminal,
}

impl<Tok: Token> Grammar<Tok> {
    pub fn start(&self) -> NonTerminal {
        self.start
    }

    /// Rules of `nt` in registration order.
    pub fn rules(&self, nt: NonTerminal) -> &[Rule] {
        let index = ensure_nonterminal(nt, self.nonterminals.len());
        &self.nonterminals[index].rules
    }

    pub fn nonterminal_name(&self, nt: NonTerminal) -> &str {
        let index = ensure_nonterminal(nt, self.nonterminals.len());
        &self.nonterminals[index].name
    }

    pub fn terminal(&self, id: TerminalId) -> &Terminal<Tok> {
        let index = ensure_terminal(id, self.terminals.len());
        &self.terminals[index]
    }

    pub fn symbol_name(&self, symbol: Symbol) -> &str {
        match symbol {
            Symbol::Terminal(id) => self.terminal(id).name(),
            Symbol::NonTerminal(nt) => self.nonterminal_name(nt),
        }
    }

    pub fn nonterminals(&self) -> impl Iterator<Item = NonTerminal> + '_ {
        (0..self.nonterminals.len() as u32).map(NonTerminal)
    }

    pub fn terminals(&self) -> impl Iterator<Item = TerminalId> + '_ {
        (0..self.terminals.len() as u32).map(TerminalId)
    }

    pub fn find_nonterminal(&self, name: &str) -> Option<NonTerminal> {
        self.nonterminals
            .iter()
            .position(|def| def.name == name)
            .map(|index| NonTerminal(index as u32))
    }
}

/// Structural problem found while staging or building a grammar.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GrammarError {
    #[error("terminal `{0}` is already registered")]
    DuplicateTerminal(String),

    #[error("token of terminal `{name}` is indistinguishable from the token of `{existing}`")]
    DuplicateToken { name: String, existing: String },

    #[error("`{0}` is used both as a terminal and as a non-terminal")]
    NameConflict(String),

    #[error("rule for `{0}` has no symbols")]
    EmptyRule(String),

    #[error("rule for `{0}` has no action")]
    EmptyAction(String),

    #[error("grammar has no rules")]
    EmptyGrammar,

    #[error("start symbol `{0}` is not a non-terminal of this grammar")]
    UndefinedStart(String),

    #[error("non-terminal `{0}` has no rules")]
    NoRules(String),

    #[error("rule for `{nonterminal}` uses undefined symbol `{symbol}`")]
    UndefinedSymbol { nonterminal: String, symbol: String },

    #[error("action of a `{nonterminal}` rule: {source}")]
    Resolve {
        nonterminal: String,
        #[source]
        source: ResolveError,
    },

    #[error("left recursion: {cycle}")]
    LeftRecursion { cycle: String },
}
