use bootgram_core::{LexError, Lexer, Literal, Token, Value};

use super::lexer::{MetaKind, MetaLexer, MetaToken, lex, token_text};

fn snapshot(source: &str) -> String {
    lex(source)
        .iter()
        .map(|t| match t.payload() {
            Some(payload) => format!("{:?} {:?} {payload}", t.kind, t.span),
            None => format!("{:?} {:?}", t.kind, t.span),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn rule_with_static_call() {
    insta::assert_snapshot!(snapshot("Sum : Term '+' Sum { static Arith.add($0, $2); }"), @r#"
    Symbol 0..3 "Sum"
    Colon 4..5
    Symbol 6..10 "Term"
    Symbol 11..14 "+"
    Symbol 15..18 "Sum"
    LBrace 19..20
    Static 21..27
    Symbol 28..33 "Arith"
    Dot 33..34
    Symbol 34..37 "add"
    LParen 37..38
    Var 38..40 0
    Comma 40..41
    Var 42..44 2
    RParen 44..45
    Semicolon 45..46
    RBrace 47..48
    "#);
}

#[test]
fn literals_carry_payloads() {
    insta::assert_snapshot!(snapshot(r#"A : x { new T(-12, 3.5, "a\"b"); }"#), @r#"
    Symbol 0..1 "A"
    Colon 2..3
    Symbol 4..5 "x"
    LBrace 6..7
    New 8..11
    Symbol 12..13 "T"
    LParen 13..14
    Int 14..17 -12
    Comma 17..18
    Double 19..22 3.5
    Comma 22..23
    Str 24..30 "a\"b"
    RParen 30..31
    Semicolon 31..32
    RBrace 33..34
    "#);
}

#[test]
fn keywords_need_a_word_boundary() {
    let kinds: Vec<MetaKind> = lex("new newer static statics").iter().map(|t| t.kind).collect();

    assert_eq!(
        kinds,
        [MetaKind::New, MetaKind::Symbol, MetaKind::Static, MetaKind::Symbol]
    );
}

#[test]
fn backslashes_other_than_quote_escapes_are_kept() {
    let tokens = lex(r#""a\nb""#);

    assert_eq!(tokens[0].payload(), Some(&Literal::from(r"a\nb")));
}

#[test]
fn oversized_integer_reads_as_double() {
    let tokens = lex("99999999999999999999");

    assert_eq!(tokens[0].kind, MetaKind::Double);
    assert_eq!(tokens[0].payload(), Some(&Literal::Double(1e20)));
}

#[test]
fn garbage_is_coalesced() {
    let source = "A : x ~~ y";

    insta::assert_snapshot!(snapshot(source), @r#"
    Symbol 0..1 "A"
    Colon 2..3
    Symbol 4..5 "x"
    Garbage 6..8
    Symbol 9..10 "y"
    "#);
    assert_eq!(token_text(source, &lex(source)[3]), "~~");
}

#[test]
fn trailing_garbage_runs_to_the_end() {
    let tokens = lex("x @#");

    assert_eq!(tokens.last().map(|t| t.span.clone()), Some(2..4));
}

#[test]
fn meta_lexer_rejects_garbage() {
    assert_eq!(
        MetaLexer.tokenize("A : ? x"),
        Err(LexError::UnknownToken { position: 4 })
    );
    assert_eq!(MetaLexer.tokenize("A : x").map(|t| t.len()), Ok(3));
}

#[test]
fn tokens_match_by_kind_only() {
    let tokens = lex("foo 1");

    assert!(tokens[0].is_compatible(&MetaToken::reference(MetaKind::Symbol)));
    assert!(!tokens[1].is_compatible(&MetaToken::reference(MetaKind::Symbol)));
    assert_eq!(tokens[1].value(), Some(Value::Int(1)));
    assert_eq!(MetaToken::reference(MetaKind::Colon).value(), None);
}
