//! Lexer for grammar text.
//!
//! Produces span-based tokens. Symbols, strings and numbers also carry their
//! decoded payload, which the parser hands to rule actions.
//!
//! ## Error handling
//!
//! Consecutive unrecognized characters are coalesced into a single `Garbage`
//! token, so the caller sees one error per malformed stretch.

use std::ops::Range;

use bootgram_core::{LexError, Lexer, Literal, Token, Value};
use logos::Logos;

/// Token kinds of grammar text.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaKind {
    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(".")]
    Dot,

    #[token("new")]
    New,

    #[token("static")]
    Static,

    /// Identifier, or a single character in single quotes (`'+'`).
    /// Keywords take precedence over identifiers of the same length.
    #[regex(r"[_a-zA-Z][_a-zA-Z0-9]*")]
    #[regex(r"'[^']'")]
    Symbol,

    /// Double-quoted string. `\"` stands for a quote.
    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    Str,

    #[regex(r"-?[0-9]+")]
    Int,

    #[regex(r"-?[0-9]+\.[0-9]+")]
    Double,

    /// `$N`: the result of the N-th symbol of a rule.
    #[regex(r"\$[0-9]+")]
    Var,

    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    /// Coalesced unrecognized characters
    Garbage,
}

/// A token of grammar text: kind, byte span and decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaToken {
    pub kind: MetaKind,
    pub span: Range<usize>,
    payload: Option<Literal>,
}

impl MetaToken {
    pub fn new(kind: MetaKind, span: Range<usize>) -> Self {
        Self {
            kind,
            span,
            payload: None,
        }
    }

    /// A payload-free token standing for every token of `kind`.
    pub fn reference(kind: MetaKind) -> Self {
        Self::new(kind, 0..0)
    }

    fn with_payload(mut self, payload: Literal) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn payload(&self) -> Option<&Literal> {
        self.payload.as_ref()
    }
}

impl Token for MetaToken {
    fn is_compatible(&self, other: &Self) -> bool {
        self.kind == other.kind
    }

    fn value(&self) -> Option<Value> {
        self.payload.as_ref().map(Literal::to_value)
    }
}

/// Tokenizes grammar text. Whitespace is dropped; malformed input becomes
/// `Garbage` tokens.
pub fn lex(source: &str) -> Vec<MetaToken> {
    let mut tokens = Vec::new();
    let mut lexer = MetaKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                let span = lexer.span();
                if let Some(start) = error_start.take() {
                    tokens.push(MetaToken::new(MetaKind::Garbage, start..span.start));
                }
                if kind == MetaKind::Whitespace {
                    continue;
                }
                match decode(kind, lexer.slice(), span.clone()) {
                    Some(token) => tokens.push(token),
                    None => error_start = Some(span.start),
                }
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(MetaToken::new(MetaKind::Garbage, start..source.len()));
                }
                break;
            }
        }
    }

    tokens
}

/// Attaches the payload of `text`. `None` if a number does not fit.
fn decode(kind: MetaKind, text: &str, span: Range<usize>) -> Option<MetaToken> {
    let token = MetaToken::new(kind, span);
    Some(match kind {
        MetaKind::Symbol => {
            let name = text
                .strip_prefix('\'')
                .and_then(|t| t.strip_suffix('\''))
                .unwrap_or(text);
            token.with_payload(Literal::from(name))
        }
        MetaKind::Str => {
            let content = &text[1..text.len() - 1];
            token.with_payload(Literal::from(unescape(content).as_str()))
        }
        // Integers out of `i64` range are read as doubles.
        MetaKind::Int => match text.parse::<i64>() {
            Ok(n) => token.with_payload(Literal::Int(n)),
            Err(_) => MetaToken {
                kind: MetaKind::Double,
                ..token
            }
            .with_payload(Literal::Double(text.parse().ok()?)),
        },
        MetaKind::Double => token.with_payload(Literal::Double(text.parse().ok()?)),
        MetaKind::Var => token.with_payload(Literal::Int(text[1..].parse().ok()?)),
        _ => token,
    })
}

/// Replaces `\"` by `"`. Other backslash pairs are kept as written.
fn unescape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Retrieves the source text of a token.
#[inline]
pub fn token_text<'s>(source: &'s str, token: &MetaToken) -> &'s str {
    &source[token.span.clone()]
}

/// [`Lexer`] over grammar text, failing at the first malformed stretch.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaLexer;

impl Lexer for MetaLexer {
    type Token = MetaToken;

    fn tokenize(&self, input: &str) -> Result<Vec<MetaToken>, LexError> {
        let tokens = lex(input);
        if let Some(garbage) = tokens.iter().find(|t| t.kind == MetaKind::Garbage) {
            return Err(LexError::UnknownToken {
                position: garbage.span.start,
            });
        }
        Ok(tokens)
    }
}
