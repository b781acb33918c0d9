//! Backtracking recursive-descent parser.

use std::sync::Arc;

use bootgram_core::{
    Grammar, GrammarError, NonTerminal, Rule, Symbol, Token, Value, check_left_recursion,
};
use serde::{Deserialize, Serialize};

use super::error::ParseError;
use super::trace::{NoopTracer, Tracer};

/// Runtime limits for one parse.
///
/// Deserializes from a partial table; missing fields keep their defaults.
///
/// Every non-terminal entered counts against `recursion_limit` until it
/// returns, so a right-recursive list nests once per item. Lists longer than
/// about a thousand items need a higher limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum non-terminal entries plus token tests (default: unlimited).
    pub(crate) exec_fuel: Option<u32>,
    /// Maximum non-terminal nesting depth (default: 1,024).
    pub(crate) recursion_limit: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            exec_fuel: None,
            recursion_limit: 1024,
        }
    }
}

impl Limits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = Some(fuel);
        self
    }

    /// Set the recursion limit.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> Option<u32> {
        self.exec_fuel
    }

    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

/// A recursive-descent parser bound to one grammar.
///
/// Construction rejects left-recursive grammars, so every expansion that
/// does not consume a token is bounded by the grammar size.
#[derive(Debug, Clone)]
pub struct RdParser<Tok> {
    grammar: Arc<Grammar<Tok>>,
    limits: Limits,
}

impl<Tok: Token> RdParser<Tok> {
    pub fn new(grammar: Grammar<Tok>) -> Result<Self, GrammarError> {
        Self::from_shared(Arc::new(grammar))
    }

    /// Wraps a grammar that is shared with other parsers.
    pub fn from_shared(grammar: Arc<Grammar<Tok>>) -> Result<Self, GrammarError> {
        check_left_recursion(&grammar)?;
        Ok(Self {
            grammar,
            limits: Limits::default(),
        })
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn grammar(&self) -> &Grammar<Tok> {
        &self.grammar
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Parses the whole of `tokens` from the start symbol.
    ///
    /// This is a convenience method that uses `NoopTracer`.
    pub fn parse(&self, tokens: &[Tok]) -> Result<Value, ParseError> {
        self.parse_with(tokens, &mut NoopTracer)
    }

    /// Parses with a tracer attached.
    pub fn parse_with<T: Tracer>(
        &self,
        tokens: &[Tok],
        tracer: &mut T,
    ) -> Result<Value, ParseError> {
        let mut run = Run {
            grammar: &self.grammar,
            tokens,
            cursor: 0,
            furthest: 0,
            depth: 0,
            fuel: self.limits.exec_fuel,
            limits: self.limits,
            tracer,
        };

        let Some(value) = run.parse_nonterminal(self.grammar.start())? else {
            return Err(ParseError::NotGenerated {
                position: run.furthest,
            });
        };
        if run.cursor < tokens.len() {
            return Err(ParseError::TrailingTokens {
                position: run.cursor,
                furthest: run.furthest,
            });
        }
        Ok(value)
    }
}

/// State of one `parse` call. `None` results mean "no match here", and the
/// caller restores its own cursor.
struct Run<'p, Tok, T> {
    grammar: &'p Grammar<Tok>,
    tokens: &'p [Tok],
    cursor: usize,
    /// Furthest position a terminal was tested at.
    furthest: usize,
    depth: u32,
    fuel: Option<u32>,
    limits: Limits,
    tracer: &'p mut T,
}

impl<Tok: Token, T: Tracer> Run<'_, Tok, T> {
    fn parse_nonterminal(&mut self, nt: NonTerminal) -> Result<Option<Value>, ParseError> {
        self.burn_fuel()?;
        if self.depth >= self.limits.recursion_limit {
            return Err(ParseError::RecursionLimitExceeded(self.limits.recursion_limit));
        }
        self.depth += 1;

        let start = self.cursor;
        self.tracer.trace_enter(nt, start);

        let grammar = self.grammar;
        let rules = grammar.rules(nt);
        let mut matched: Option<(usize, usize, Value)> = None;
        let mut epsilon = None;

        for (index, rule) in rules.iter().enumerate() {
            if rule.is_epsilon() {
                epsilon = Some(index);
                continue;
            }

            self.cursor = start;
            self.tracer.trace_attempt(nt, index, start);
            let Some(value) = self.parse_rule(nt, index, rule)? else {
                self.tracer.trace_backtrack(nt, index, start);
                continue;
            };

            if let Some((first, ..)) = matched {
                return Err(ParseError::Ambiguous {
                    nonterminal: grammar.nonterminal_name(nt).to_string(),
                    first: grammar.production(nt, &rules[first]),
                    second: grammar.production(nt, rule),
                    position: start,
                });
            }
            matched = Some((index, self.cursor, value));
        }

        let result = match (matched, epsilon) {
            (Some((_, end, value)), _) => {
                self.cursor = end;
                Some(value)
            }
            (None, Some(index)) => {
                self.cursor = start;
                Some(self.reduce(nt, index, &rules[index], &[])?)
            }
            (None, None) => {
                self.cursor = start;
                None
            }
        };

        self.depth -= 1;
        self.tracer.trace_exit(nt, result.is_some(), self.cursor);
        Ok(result)
    }

    fn parse_rule(
        &mut self,
        nt: NonTerminal,
        index: usize,
        rule: &Rule,
    ) -> Result<Option<Value>, ParseError> {
        let mut results = Vec::with_capacity(rule.len());

        for &symbol in rule.symbols() {
            match symbol {
                Symbol::Terminal(_) if symbol.is_empty_string() => results.push(Value::Null),
                Symbol::Terminal(id) => {
                    self.burn_fuel()?;
                    let terminal = self.grammar.terminal(id);
                    self.furthest = self.furthest.max(self.cursor);
                    match self.tokens.get(self.cursor) {
                        Some(token) if terminal.matches(token) => {
                            self.tracer.trace_shift(id, self.cursor);
                            results.push(token.value().unwrap_or_default());
                            self.cursor += 1;
                        }
                        _ => {
                            self.tracer.trace_mismatch(id, self.cursor);
                            return Ok(None);
                        }
                    }
                }
                Symbol::NonTerminal(inner) => match self.parse_nonterminal(inner)? {
                    Some(value) => results.push(value),
                    None => return Ok(None),
                },
            }
        }

        self.reduce(nt, index, rule, &results).map(Some)
    }

    fn reduce(
        &mut self,
        nt: NonTerminal,
        index: usize,
        rule: &Rule,
        results: &[Value],
    ) -> Result<Value, ParseError> {
        let value = rule.action().evaluate(results)?;
        self.tracer.trace_reduce(nt, index, &value);
        Ok(value)
    }

    fn burn_fuel(&mut self) -> Result<(), ParseError> {
        let Some(fuel) = self.fuel.as_mut() else {
            return Ok(());
        };
        if *fuel == 0 {
            return Err(ParseError::ExecFuelExhausted(
                self.limits.exec_fuel.unwrap_or_default(),
            ));
        }
        *fuel -= 1;
        Ok(())
    }
}
