//! The grammar of grammar text.
//!
//! Grammar text is itself parsed by the LL(1) engine. The meta grammar is
//! assembled here directly through [`GrammarBuilder`], with actions that
//! build a [`GrammarDefinition`] out of the types in [`definition`].
//!
//! ```text
//! Grammar  : Rule Grammar1
//! Grammar1 : Rule Grammar1 | ε
//! Rule     : symbol ':' Symbols '{' Exprs '}'
//! Symbols  : symbol Symbols | ε
//! Exprs    : Expr ';' Exprs | ε
//! Expr     : kw_new Name '(' Args ')'
//!          | kw_static Name '(' Args ')'
//!          | Name '(' Expr ArgsTail ')'
//!          | Literal
//! Name     : symbol NameTail
//! NameTail : '.' symbol NameTail | ε
//! Args     : Expr ArgsTail | ε
//! ArgsTail : ',' Expr ArgsTail | ε
//! Literal  : var | string | int | double
//! ```

mod definition;
mod lexer;

#[cfg(test)]
mod lexer_tests;

use std::sync::OnceLock;

use bootgram_core::{
    EMPTY_STRING, ExprTemplate, Grammar, GrammarBuilder, GrammarError, Registry,
};
use bootgram_engine::{ParseError, RdParser};

use crate::Error;
use crate::diagnostics::SourceDiagnostic;

pub use definition::{GrammarDefinition, RuleDefinition};
pub use lexer::{MetaKind, MetaLexer, MetaToken, lex, token_text};

const TERMINALS: [(&str, MetaKind); 15] = [
    ("colon", MetaKind::Colon),
    ("semicolon", MetaKind::Semicolon),
    ("comma", MetaKind::Comma),
    ("lparen", MetaKind::LParen),
    ("rparen", MetaKind::RParen),
    ("lbrace", MetaKind::LBrace),
    ("rbrace", MetaKind::RBrace),
    ("dot", MetaKind::Dot),
    ("kw_new", MetaKind::New),
    ("kw_static", MetaKind::Static),
    ("symbol", MetaKind::Symbol),
    ("string", MetaKind::Str),
    ("int", MetaKind::Int),
    ("double", MetaKind::Double),
    ("var", MetaKind::Var),
];

type MetaRule = (&'static str, &'static [&'static str], Vec<ExprTemplate>);

fn rule(
    nonterminal: &'static str,
    symbols: &'static [&'static str],
    action: Vec<ExprTemplate>,
) -> MetaRule {
    (nonterminal, symbols, action)
}

fn var(index: usize) -> ExprTemplate {
    ExprTemplate::variable(index)
}

fn vars(indices: &[usize]) -> Vec<ExprTemplate> {
    indices.iter().copied().map(var).collect()
}

/// `receiver.method(args)` on variables.
fn invoke(method: &str, receiver: usize, args: &[usize]) -> ExprTemplate {
    ExprTemplate::invoke(method, var(receiver), vars(args))
}

fn call(method: &str, args: &[usize]) -> Vec<ExprTemplate> {
    vec![ExprTemplate::call(method, vars(args))]
}

fn construct(type_name: &str, args: &[usize]) -> Vec<ExprTemplate> {
    vec![ExprTemplate::construct(type_name, vars(args))]
}

fn meta_rules() -> Vec<MetaRule> {
    vec![
        rule(
            "Grammar",
            &["Rule", "Grammar1"],
            vec![
                invoke("Meta.Definition.add_rule", 1, &[0]),
                invoke("Meta.Definition.set_start", 1, &[0]),
            ],
        ),
        rule(
            "Grammar1",
            &["Rule", "Grammar1"],
            vec![invoke("Meta.Definition.add_rule", 1, &[0])],
        ),
        rule("Grammar1", &[EMPTY_STRING], construct("Meta.Definition", &[])),
        rule(
            "Rule",
            &["symbol", "colon", "Symbols", "lbrace", "Exprs", "rbrace"],
            construct("Meta.Rule", &[0, 2, 4]),
        ),
        rule(
            "Symbols",
            &["symbol", "Symbols"],
            vec![invoke("Meta.Names.prepend", 1, &[0])],
        ),
        rule("Symbols", &[EMPTY_STRING], construct("Meta.Names", &[])),
        rule(
            "Exprs",
            &["Expr", "semicolon", "Exprs"],
            vec![invoke("Meta.Exprs.prepend", 2, &[0])],
        ),
        rule("Exprs", &[EMPTY_STRING], construct("Meta.Exprs", &[])),
        rule(
            "Expr",
            &["kw_new", "Name", "lparen", "Args", "rparen"],
            call("Meta.Expr.construct", &[1, 3]),
        ),
        rule(
            "Expr",
            &["kw_static", "Name", "lparen", "Args", "rparen"],
            call("Meta.Expr.call", &[1, 3]),
        ),
        rule(
            "Expr",
            &["Name", "lparen", "Expr", "ArgsTail", "rparen"],
            call("Meta.Expr.invoke", &[0, 2, 3]),
        ),
        rule("Expr", &["Literal"], vars(&[0])),
        rule(
            "Name",
            &["symbol", "NameTail"],
            vec![invoke("Meta.Names.prepend", 1, &[0])],
        ),
        rule(
            "NameTail",
            &["dot", "symbol", "NameTail"],
            vec![invoke("Meta.Names.prepend", 2, &[1])],
        ),
        rule("NameTail", &[EMPTY_STRING], construct("Meta.Names", &[])),
        rule(
            "Args",
            &["Expr", "ArgsTail"],
            vec![invoke("Meta.Exprs.prepend", 1, &[0])],
        ),
        rule("Args", &[EMPTY_STRING], construct("Meta.Exprs", &[])),
        rule(
            "ArgsTail",
            &["comma", "Expr", "ArgsTail"],
            vec![invoke("Meta.Exprs.prepend", 2, &[1])],
        ),
        rule("ArgsTail", &[EMPTY_STRING], construct("Meta.Exprs", &[])),
        rule("Literal", &["var"], call("Meta.Expr.variable", &[0])),
        rule("Literal", &["string"], call("Meta.Expr.constant", &[0])),
        rule("Literal", &["int"], call("Meta.Expr.constant", &[0])),
        rule("Literal", &["double"], call("Meta.Expr.constant", &[0])),
    ]
}

/// Builds the grammar of grammar text.
pub fn meta_grammar() -> Result<Grammar<MetaToken>, GrammarError> {
    let mut builder = GrammarBuilder::new();
    for (name, kind) in TERMINALS {
        builder.register_terminal(name, MetaToken::reference(kind))?;
    }
    for (nonterminal, symbols, action) in meta_rules() {
        builder.register_rule(nonterminal, symbols.iter().copied(), action)?;
    }

    let registry = Registry::new([definition::meta_module()]).map_err(|source| {
        GrammarError::Resolve {
            nonterminal: "Grammar".to_string(),
            source,
        }
    })?;
    builder.build(&registry)
}

static META: OnceLock<Result<RdParser<MetaToken>, GrammarError>> = OnceLock::new();

/// The shared parser for grammar text, built on first use.
pub fn meta_parser() -> Result<&'static RdParser<MetaToken>, GrammarError> {
    META.get_or_init(|| meta_grammar().and_then(RdParser::new))
        .as_ref()
        .map_err(Clone::clone)
}

/// Parses grammar text into a [`GrammarDefinition`].
///
/// Lexical and syntax errors are reported as a [`SourceDiagnostic`] pointing
/// into `source`.
pub fn parse_definition(source: &str) -> Result<GrammarDefinition, Error> {
    let parser = meta_parser()?;
    let tokens = lex(source);

    if let Some(garbage) = tokens.iter().find(|t| t.kind == MetaKind::Garbage) {
        return Err(Error::Syntax(SourceDiagnostic::new(
            format!("unknown token `{}`", token_text(source, garbage)),
            garbage.span.clone(),
        )));
    }

    let value = parser
        .parse(&tokens)
        .map_err(|err| Error::Syntax(syntax_diagnostic(source, &tokens, err)))?;
    value
        .extract::<GrammarDefinition>()
        .ok_or(Error::ResultType {
            expected: std::any::type_name::<GrammarDefinition>(),
            found: value.type_name(),
        })
}

fn syntax_diagnostic(source: &str, tokens: &[MetaToken], err: ParseError) -> SourceDiagnostic {
    let furthest = match err {
        ParseError::NotGenerated { position } => position,
        ParseError::TrailingTokens { furthest, .. } => furthest,
        other => return SourceDiagnostic::new(other.to_string(), 0..source.len()),
    };
    match tokens.get(furthest) {
        Some(token) => SourceDiagnostic::new(
            format!("unexpected `{}`", token_text(source, token)),
            token.span.clone(),
        ),
        None => SourceDiagnostic::new(
            "unexpected end of grammar text",
            source.len()..source.len(),
        ),
    }
}
