//! Typed parsers built from grammar text.

use std::any::Any;
use std::marker::PhantomData;

use bootgram_core::{Grammar, GrammarBuilder, Lexer, Registry};
use bootgram_engine::{Limits, NoopTracer, RdParser, Tracer};

use crate::bootstrap::parse_definition;
use crate::{Error, Result};

/// A parser for one language, producing values of type `T`.
///
/// Built once from grammar text, a lexer, the terminal table and a registry
/// of the native types the actions use. Parsing does not mutate the parser.
///
/// Parses run under [`Limits::default`]. Right recursion nests one level per
/// repetition, so long lists need [`with_limits`](Self::with_limits).
pub struct Parser<T, L: Lexer> {
    lexer: L,
    engine: RdParser<L::Token>,
    result: PhantomData<fn() -> T>,
}

impl<T: Any + Clone, L: Lexer> Parser<T, L> {
    /// Reads `grammar` and binds it to `terminals` and `registry`.
    ///
    /// Each terminal is a name usable in the grammar text plus a reference
    /// token; input tokens compatible with it match the terminal.
    pub fn new<N>(
        grammar: &str,
        lexer: L,
        terminals: impl IntoIterator<Item = (N, L::Token)>,
        registry: &Registry,
    ) -> Result<Self>
    where
        N: Into<String>,
    {
        let definition = parse_definition(grammar)?;

        let mut builder = GrammarBuilder::new();
        for (name, token) in terminals {
            builder.register_terminal(name, token)?;
        }
        definition.replay(&mut builder)?;
        let engine = RdParser::new(builder.build(registry)?)?;

        Ok(Self {
            lexer,
            engine,
            result: PhantomData,
        })
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.engine = self.engine.with_limits(limits);
        self
    }

    pub fn grammar(&self) -> &Grammar<L::Token> {
        self.engine.grammar()
    }

    pub fn parse(&self, input: &str) -> Result<T> {
        self.parse_traced(input, &mut NoopTracer)
    }

    /// Like [`parse`](Self::parse), reporting every step to `tracer`.
    pub fn parse_traced<Tr: Tracer>(&self, input: &str, tracer: &mut Tr) -> Result<T> {
        let tokens = self.lexer.tokenize(input)?;
        let value = self.engine.parse_with(&tokens, tracer)?;
        value.extract::<T>().ok_or(Error::ResultType {
            expected: std::any::type_name::<T>(),
            found: value.type_name(),
        })
    }

    /// Parses `input`, discarding the reason of a failure.
    pub fn try_parse(&self, input: &str) -> Option<T> {
        self.parse(input).ok()
    }
}
