//! Errors that can occur while parsing a token sequence.

use bootgram_core::EvalError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// No rule of the start symbol matches. `position` is the furthest token
    /// index a terminal was tested at.
    #[error("input is not generated by the grammar (failed at token {position})")]
    NotGenerated { position: usize },

    /// The start symbol matched a prefix of the input only. `furthest` is
    /// the furthest token index a terminal was tested at.
    #[error("unexpected trailing input at token {position}")]
    TrailingTokens { position: usize, furthest: usize },

    /// Two rules of one non-terminal matched at the same position.
    #[error("ambiguous grammar: `{first}` and `{second}` both match at token {position}")]
    Ambiguous {
        nonterminal: String,
        first: String,
        second: String,
        position: usize,
    },

    /// A rule action failed.
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// Execution fuel exhausted (too many non-terminal entries and token tests).
    #[error("parse step limit of {0} exceeded")]
    ExecFuelExhausted(u32),

    /// Too many nested non-terminal expansions.
    #[error("recursion limit of {0} exceeded")]
    RecursionLimitExceeded(u32),
}
