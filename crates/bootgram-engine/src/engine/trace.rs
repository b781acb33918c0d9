//! Tracing infrastructure for debugging parses.
//!
//! # Design: Zero-Cost Abstraction
//!
//! The parser is generic over its [`Tracer`]. With `NoopTracer` every method
//! is an `#[inline(always)]` empty function and the calls disappear.
//!
//! # Design: Tracer-Owned State
//!
//! The parser passes raw handles (non-terminals, rule indices, terminal ids,
//! token positions). Name lookup, rule rendering and indentation are kept in
//! the tracer, so parse state carries nothing for display purposes.

use bootgram_core::{Grammar, NonTerminal, TerminalId, Token, Value};

use crate::Colors;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Non-terminal entry and exit, reductions and backtracks.
    #[default]
    Default,
    /// Adds rule attempts and every token test.
    Verbose,
    /// Adds the value produced by each reduction.
    VeryVerbose,
}

/// Parser instrumentation hooks.
///
/// Positions are token indices into the input slice.
pub trait Tracer {
    /// Called before the rules of `nt` are tried.
    fn trace_enter(&mut self, nt: NonTerminal, position: usize);

    /// Called before rule `rule` of `nt` is tried.
    fn trace_attempt(&mut self, nt: NonTerminal, rule: usize, position: usize);

    /// Called when the token at `position` matched `terminal`.
    fn trace_shift(&mut self, terminal: TerminalId, position: usize);

    /// Called when the token at `position` (or end of input) did not match `terminal`.
    fn trace_mismatch(&mut self, terminal: TerminalId, position: usize);

    /// Called when rule `rule` of `nt` failed and the cursor returns to `position`.
    fn trace_backtrack(&mut self, nt: NonTerminal, rule: usize, position: usize);

    /// Called after the action of rule `rule` of `nt` produced `value`.
    fn trace_reduce(&mut self, nt: NonTerminal, rule: usize, value: &Value);

    /// Called when `nt` is done. `matched` is false if no rule matched.
    fn trace_exit(&mut self, nt: NonTerminal, matched: bool, position: usize);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_enter(&mut self, _nt: NonTerminal, _position: usize) {}

    #[inline(always)]
    fn trace_attempt(&mut self, _nt: NonTerminal, _rule: usize, _position: usize) {}

    #[inline(always)]
    fn trace_shift(&mut self, _terminal: TerminalId, _position: usize) {}

    #[inline(always)]
    fn trace_mismatch(&mut self, _terminal: TerminalId, _position: usize) {}

    #[inline(always)]
    fn trace_backtrack(&mut self, _nt: NonTerminal, _rule: usize, _position: usize) {}

    #[inline(always)]
    fn trace_reduce(&mut self, _nt: NonTerminal, _rule: usize, _value: &Value) {}

    #[inline(always)]
    fn trace_exit(&mut self, _nt: NonTerminal, _matched: bool, _position: usize) {}
}

const ENTER: &str = "▶";
const EXIT: &str = "◀";
const FAIL: &str = "✗";
const ATTEMPT: &str = "?";
const SHIFT: &str = "●";
const MISMATCH: &str = "○";
const BACKTRACK: &str = "↺";
const REDUCE: &str = "◆";

/// Tracer that collects a readable trace, indented by expansion depth.
pub struct PrintTracer {
    verbosity: Verbosity,
    colors: Colors,
    /// Collected trace lines.
    lines: Vec<String>,
    nonterminal_names: Vec<String>,
    terminal_names: Vec<String>,
    /// `Name : symbols` per non-terminal, per rule.
    productions: Vec<Vec<String>>,
    depth: usize,
}

impl PrintTracer {
    pub fn new<Tok: Token>(grammar: &Grammar<Tok>, verbosity: Verbosity, colors: Colors) -> Self {
        let nonterminal_names = grammar
            .nonterminals()
            .map(|nt| grammar.nonterminal_name(nt).to_string())
            .collect();
        let terminal_names = grammar
            .terminals()
            .map(|id| grammar.terminal(id).name().to_string())
            .collect();
        let productions = grammar
            .nonterminals()
            .map(|nt| {
                grammar
                    .rules(nt)
                    .iter()
                    .map(|rule| grammar.production(nt, rule))
                    .collect()
            })
            .collect();

        Self {
            verbosity,
            colors,
            lines: Vec::new(),
            nonterminal_names,
            terminal_names,
            productions,
            depth: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines joined by newlines.
    pub fn output(&self) -> String {
        self.lines.join("\n")
    }

    /// Print all trace lines.
    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
    }

    fn nonterminal_name(&self, nt: NonTerminal) -> &str {
        self.nonterminal_names
            .get(nt.as_u32() as usize)
            .map_or("?", |s| s.as_str())
    }

    fn terminal_name(&self, id: TerminalId) -> &str {
        self.terminal_names
            .get(id.as_u32() as usize)
            .map_or("?", |s| s.as_str())
    }

    fn production(&self, nt: NonTerminal, rule: usize) -> &str {
        self.productions
            .get(nt.as_u32() as usize)
            .and_then(|rules| rules.get(rule))
            .map_or("?", |s| s.as_str())
    }

    fn push(&mut self, symbol: &str, content: String) {
        let indent = "  ".repeat(self.depth);
        self.lines.push(format!("{indent}{symbol} {content}"));
    }

    fn position(&self, position: usize) -> String {
        let c = self.colors;
        format!("{}@{position}{}", c.position, c.reset)
    }
}

impl Tracer for PrintTracer {
    fn trace_enter(&mut self, nt: NonTerminal, position: usize) {
        let c = self.colors;
        let content = format!(
            "{}{}{} {}",
            c.nonterminal,
            self.nonterminal_name(nt),
            c.reset,
            self.position(position)
        );
        self.push(ENTER, content);
        self.depth += 1;
    }

    fn trace_attempt(&mut self, nt: NonTerminal, rule: usize, position: usize) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        let content = format!("{} {}", self.production(nt, rule), self.position(position));
        self.push(ATTEMPT, content);
    }

    fn trace_shift(&mut self, terminal: TerminalId, position: usize) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        let c = self.colors;
        let content = format!(
            "{}{}{} {}",
            c.token,
            self.terminal_name(terminal),
            c.reset,
            self.position(position)
        );
        self.push(SHIFT, content);
    }

    fn trace_mismatch(&mut self, terminal: TerminalId, position: usize) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        let content = format!(
            "{} {}",
            self.terminal_name(terminal),
            self.position(position)
        );
        self.push(MISMATCH, content);
    }

    fn trace_backtrack(&mut self, nt: NonTerminal, rule: usize, position: usize) {
        let content = format!("{} {}", self.production(nt, rule), self.position(position));
        self.push(BACKTRACK, content);
    }

    fn trace_reduce(&mut self, nt: NonTerminal, rule: usize, value: &Value) {
        let production = self.production(nt, rule);
        let content = if self.verbosity == Verbosity::VeryVerbose {
            format!("{production} = {value:?}")
        } else {
            production.to_string()
        };
        self.push(REDUCE, content);
    }

    fn trace_exit(&mut self, nt: NonTerminal, matched: bool, position: usize) {
        self.depth = self.depth.saturating_sub(1);
        let c = self.colors;
        let (symbol, color) = if matched { (EXIT, c.nonterminal) } else { (FAIL, c.failure) };
        let content = format!(
            "{color}{}{} {}",
            self.nonterminal_name(nt),
            c.reset,
            self.position(position)
        );
        self.push(symbol, content);
    }
}
