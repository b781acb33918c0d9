use std::sync::Arc;

use bootgram_core::{CallError, EMPTY_STRING, EvalError, GrammarError, InvokeError, Value};

use crate::test_utils::{Tok, arithmetic, call, grammar, list, var};

use super::{Limits, ParseError, RdParser};

fn parse(tokens: &[Tok]) -> Result<Value, ParseError> {
    RdParser::new(arithmetic()).unwrap().parse(tokens)
}

#[test]
fn products_bind_tighter_than_sums() {
    let tokens = [Tok::Int(1), Tok::Plus, Tok::Int(2), Tok::Star, Tok::Int(3)];

    assert_eq!(parse(&tokens).unwrap(), Value::Int(7));
}

#[test]
fn parentheses_group() {
    let tokens = [
        Tok::LParen,
        Tok::Int(1),
        Tok::Plus,
        Tok::Int(2),
        Tok::RParen,
        Tok::Star,
        Tok::Int(3),
    ];

    assert_eq!(parse(&tokens).unwrap(), Value::Int(9));
}

#[test]
fn epsilon_rule_is_the_fallback() {
    let parser = RdParser::new(list()).unwrap();

    assert_eq!(parser.parse(&[]).unwrap(), Value::Int(0));
    assert_eq!(
        parser.parse(&[Tok::Int(2), Tok::Int(3), Tok::Int(4)]).unwrap(),
        Value::Int(9)
    );
}

#[test]
fn not_generated_reports_furthest_token() {
    assert_eq!(
        parse(&[Tok::Plus]).unwrap_err(),
        ParseError::NotGenerated { position: 0 }
    );
    assert_eq!(
        parse(&[Tok::LParen, Tok::Int(1)]).unwrap_err(),
        ParseError::NotGenerated { position: 2 }
    );
}

#[test]
fn trailing_tokens_are_rejected() {
    let err = parse(&[Tok::Int(1), Tok::Plus]).unwrap_err();

    assert_eq!(
        err,
        ParseError::TrailingTokens {
            position: 1,
            furthest: 2
        }
    );
}

#[test]
fn two_matching_rules_are_ambiguous() {
    let g = grammar(&[
        ("S", &["A"], var(0)),
        ("S", &["B"], var(0)),
        ("A", &["int"], var(0)),
        ("B", &["int"], var(0)),
    ]);
    let parser = RdParser::new(g).unwrap();

    let err = parser.parse(&[Tok::Int(1)]).unwrap_err();

    assert_eq!(
        err,
        ParseError::Ambiguous {
            nonterminal: "S".into(),
            first: "S : A".into(),
            second: "S : B".into(),
            position: 0,
        }
    );
    insta::assert_snapshot!(err.to_string(), @"ambiguous grammar: `S : A` and `S : B` both match at token 0");
}

#[test]
fn left_recursion_is_rejected_at_construction() {
    let g = grammar(&[
        ("L", &["L", "plus", "int"], var(0)),
        ("L", &["int"], var(0)),
    ]);

    let err = RdParser::new(g).unwrap_err();

    assert_eq!(
        err,
        GrammarError::LeftRecursion {
            cycle: "L -> L".into()
        }
    );
}

#[test]
fn action_failures_abort_the_parse() {
    let g = grammar(&[("S", &["int"], call("Calc.fail", vec![var(0)]))]);
    let parser = RdParser::new(g).unwrap();

    let err = parser.parse(&[Tok::Int(1)]).unwrap_err();

    assert_eq!(
        err,
        ParseError::Eval(EvalError::Call(CallError::Invoke {
            name: "Calc.fail".into(),
            source: InvokeError::failed("boom"),
        }))
    );
}

#[test]
fn inner_epsilon_yields_null_slot() {
    let last = grammar(&[("S", &["int", EMPTY_STRING, "int"], var(2))]);
    let middle = grammar(&[("S", &["int", EMPTY_STRING, "int"], var(1))]);
    let tokens = [Tok::Int(1), Tok::Int(2)];

    assert_eq!(
        RdParser::new(last).unwrap().parse(&tokens).unwrap(),
        Value::Int(2)
    );
    assert_eq!(
        RdParser::new(middle).unwrap().parse(&tokens).unwrap_err(),
        ParseError::Eval(EvalError::NullResult)
    );
}

#[test]
fn recursion_limit() {
    let parser = RdParser::new(arithmetic())
        .unwrap()
        .with_limits(Limits::new().recursion_limit(6));
    let tokens = [Tok::LParen, Tok::LParen, Tok::Int(1), Tok::RParen, Tok::RParen];

    let err = parser.parse(&tokens).unwrap_err();

    assert_eq!(err, ParseError::RecursionLimitExceeded(6));
}

#[test]
fn exec_fuel() {
    let parser = RdParser::new(list())
        .unwrap()
        .with_limits(Limits::new().exec_fuel(5));

    assert_eq!(parser.parse(&[Tok::Int(1)]).unwrap(), Value::Int(1));
    assert_eq!(
        parser.parse(&[Tok::Int(1), Tok::Int(1)]).unwrap_err(),
        ParseError::ExecFuelExhausted(5)
    );
}

#[test]
fn limits_load_from_partial_config() {
    let limits: Limits = serde_json::from_str(r#"{"recursion_limit": 8}"#).unwrap();

    assert_eq!(limits, Limits::new().recursion_limit(8));
    assert_eq!(limits.get_exec_fuel(), None);
    insta::assert_snapshot!(
        serde_json::to_string(&Limits::new().exec_fuel(10)).unwrap(),
        @r#"{"exec_fuel":10,"recursion_limit":1024}"#
    );
}

#[test]
fn parsers_share_one_grammar_across_threads() {
    let shared = Arc::new(list());
    let parsers = [
        RdParser::from_shared(Arc::clone(&shared)).unwrap(),
        RdParser::from_shared(shared).unwrap(),
    ];

    let sums: Vec<i64> = std::thread::scope(|scope| {
        let handles: Vec<_> = parsers
            .iter()
            .enumerate()
            .map(|(i, parser)| {
                scope.spawn(move || {
                    let tokens = vec![Tok::Int(i as i64 + 1); 3];
                    parser.parse(&tokens).unwrap().as_int().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sums, vec![3, 6]);
}
