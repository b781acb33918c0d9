//! Token and lexer capabilities supplied by the embedding application.

use crate::Value;

/// An input token as seen by the parser.
///
/// Terminals hold one reference token each; an input token matches a terminal
/// when the two are compatible, i.e. of the same kind regardless of payload.
pub trait Token: 'static {
    /// Same-kind test. Should be symmetric.
    fn is_compatible(&self, other: &Self) -> bool;

    /// Payload surfaced into the parse results. Tokens without one yield `None`,
    /// which the parser records as [`Value::Null`].
    fn value(&self) -> Option<Value> {
        None
    }
}

/// Splits an input string into tokens.
pub trait Lexer {
    type Token: Token;

    fn tokenize(&self, input: &str) -> Result<Vec<Self::Token>, LexError>;
}

/// Lexical failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// Input at `position` (byte offset) does not start any known token.
    #[error("unknown token at position {position}")]
    UnknownToken { position: usize },
}
