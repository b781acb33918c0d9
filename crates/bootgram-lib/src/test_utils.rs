//! Small languages used by the parser tests.

use std::collections::VecDeque;
use std::fmt;

use bootgram_core::{InvokeError, LexError, Lexer, Module, Registry, Token, Value, ValueKind};
use logos::Logos;

use crate::Parser;

fn tokenize<'s, K>(input: &'s str, is_trivia: fn(&K) -> bool) -> Result<Vec<K>, LexError>
where
    K: Logos<'s, Source = str, Extras = (), Error = ()>,
{
    let mut tokens = Vec::new();
    for (token, span) in K::lexer(input).spanned() {
        let token = token.map_err(|()| LexError::UnknownToken {
            position: span.start,
        })?;
        if !is_trivia(&token) {
            tokens.push(token);
        }
    }
    Ok(tokens)
}

fn same_kind<K>(a: &K, b: &K) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

// Arithmetic: left-associative operators folded from right-recursive tails.

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum ArithToken {
    #[regex("[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Num(i64),
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[regex(r"[ \t\n]+")]
    Whitespace,
}

impl Token for ArithToken {
    fn is_compatible(&self, other: &Self) -> bool {
        same_kind(self, other)
    }

    fn value(&self) -> Option<Value> {
        match self {
            Self::Num(n) => Some(Value::Int(*n)),
            _ => None,
        }
    }
}

pub struct ArithLexer;

impl Lexer for ArithLexer {
    type Token = ArithToken;

    fn tokenize(&self, input: &str) -> Result<Vec<ArithToken>, LexError> {
        tokenize(input, |t| matches!(t, ArithToken::Whitespace))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(i64),
    Binary {
        op: char,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArithError {
    #[error("division by zero")]
    DivideByZero,
}

impl Expr {
    pub fn eval(&self) -> Result<i64, ArithError> {
        match self {
            Self::Num(n) => Ok(*n),
            Self::Binary { op, left, right } => {
                let (l, r) = (left.eval()?, right.eval()?);
                match op {
                    '+' => Ok(l + r),
                    '-' => Ok(l - r),
                    '*' => Ok(l * r),
                    _ if r == 0 => Err(ArithError::DivideByZero),
                    _ => Ok(l / r),
                }
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
        }
    }
}

/// Operators and operands following the first operand, in source order.
#[derive(Debug, Clone, Default)]
struct Tail(VecDeque<(char, Expr)>);

pub const ARITH_GRAMMAR: &str = r#"
Sum : Product SumTail { Arith.Tail.fold($1, $0); }
SumTail : '+' Product SumTail { Arith.Tail.prepend($2, "+", $1); }
SumTail : '-' Product SumTail { Arith.Tail.prepend($2, "-", $1); }
SumTail : _empty_string_ { new Arith.Tail(); }
Product : Atom ProductTail { Arith.Tail.fold($1, $0); }
ProductTail : '*' Atom ProductTail { Arith.Tail.prepend($2, "*", $1); }
ProductTail : '/' Atom ProductTail { Arith.Tail.prepend($2, "/", $1); }
ProductTail : _empty_string_ { new Arith.Tail(); }
Atom : num { new Arith.Expr($0); }
Atom : '(' Sum ')' { $1; }
"#;

pub fn arith_terminals() -> Vec<(&'static str, ArithToken)> {
    vec![
        ("num", ArithToken::Num(0)),
        ("+", ArithToken::Plus),
        ("-", ArithToken::Minus),
        ("*", ArithToken::Star),
        ("/", ArithToken::Slash),
        ("(", ArithToken::LParen),
        (")", ArithToken::RParen),
    ]
}

pub fn arith_registry() -> Registry {
    let expr = ValueKind::native::<Expr>();
    let mut module = Module::new("arith");
    module
        .add_native::<Expr>("Arith.Expr")
        .constructor(&[ValueKind::Int], |args| {
            Ok(Value::object(Expr::Num(args.int(0)?)))
        });
    module
        .add_native::<Tail>("Arith.Tail")
        .constructor(&[], |_| Ok(Value::object(Tail::default())))
        .method("prepend", &[ValueKind::Str, expr], |this, args| {
            let op = args.str(0)?.chars().next().ok_or(InvokeError::Argument {
                index: 0,
                expected: "an operator",
            })?;
            let operand = args.extract::<Expr>(1)?;
            tail_mut(this)?.0.push_front((op, operand));
            Ok(this.clone())
        })
        .method("fold", &[expr], |this, args| {
            let first = args.extract::<Expr>(0)?;
            let folded = tail_mut(this)?
                .0
                .iter()
                .cloned()
                .fold(first, |left, (op, right)| Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                });
            Ok(Value::object(folded))
        });
    Registry::new([module]).unwrap()
}

fn tail_mut(this: &Value) -> Result<std::cell::RefMut<'_, Tail>, InvokeError> {
    this.downcast_mut::<Tail>()
        .ok_or(InvokeError::Receiver { expected: "a tail" })
}

pub fn arith_parser() -> Parser<Expr, ArithLexer> {
    arith_parser_from(ARITH_GRAMMAR).unwrap()
}

pub fn arith_parser_from<T: std::any::Any + Clone>(
    grammar: &str,
) -> crate::Result<Parser<T, ArithLexer>> {
    Parser::new(grammar, ArithLexer, arith_terminals(), &arith_registry())
}

// Untyped lambda calculus, fully parenthesized.

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum LambdaToken {
    #[regex("[a-z][a-z0-9]*", |lex| lex.slice().to_string())]
    Var(String),
    #[token("\\")]
    Backslash,
    #[token(".")]
    Dot,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[regex(r"[ \t\n]+")]
    Whitespace,
}

impl Token for LambdaToken {
    fn is_compatible(&self, other: &Self) -> bool {
        same_kind(self, other)
    }

    fn value(&self) -> Option<Value> {
        match self {
            Self::Var(name) => Some(Value::str(name)),
            _ => None,
        }
    }
}

pub struct LambdaLexer;

impl Lexer for LambdaLexer {
    type Token = LambdaToken;

    fn tokenize(&self, input: &str) -> Result<Vec<LambdaToken>, LexError> {
        tokenize(input, |t| matches!(t, LambdaToken::Whitespace))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Var(String),
    App(Box<Term>, Box<Term>),
    Abs(String, Box<Term>),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(name) => write!(f, "{name}"),
            Self::App(what, to) => write!(f, "({what} {to})"),
            Self::Abs(var, body) => write!(f, "(\\{var}. {body})"),
        }
    }
}

pub const LAMBDA_GRAMMAR: &str = r"
Term : var { new Lambda.Term($0); }
Term : '(' Inner ')' { $1; }
Inner : Term Term { static Lambda.Term.apply($0, $1); }
Inner : '\' var '.' Term { static Lambda.Term.abstraction($1, $3); }
";

pub fn lambda_parser() -> Parser<Term, LambdaLexer> {
    let term = ValueKind::native::<Term>();
    let mut module = Module::new("lambda");
    module
        .add_native::<Term>("Lambda.Term")
        .constructor(&[ValueKind::Str], |args| {
            Ok(Value::object(Term::Var(args.str(0)?.to_string())))
        })
        .static_method("apply", &[term, term], |args| {
            let what = args.extract::<Term>(0)?;
            let to = args.extract::<Term>(1)?;
            Ok(Value::object(Term::App(Box::new(what), Box::new(to))))
        })
        .static_method("abstraction", &[ValueKind::Str, term], |args| {
            let var = args.str(0)?.to_string();
            let body = args.extract::<Term>(1)?;
            Ok(Value::object(Term::Abs(var, Box::new(body))))
        });

    let terminals = [
        ("var", LambdaToken::Var(String::new())),
        ("\\", LambdaToken::Backslash),
        (".", LambdaToken::Dot),
        ("(", LambdaToken::LParen),
        (")", LambdaToken::RParen),
    ];
    let registry = Registry::new([module]).unwrap();
    Parser::new(LAMBDA_GRAMMAR, LambdaLexer, terminals, &registry).unwrap()
}

// Whitespace-separated integers.

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum SeqToken {
    #[regex("-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Num(i64),
    #[regex(r"[ \t\n]+")]
    Whitespace,
}

impl Token for SeqToken {
    fn is_compatible(&self, other: &Self) -> bool {
        same_kind(self, other)
    }

    fn value(&self) -> Option<Value> {
        match self {
            Self::Num(n) => Some(Value::Int(*n)),
            Self::Whitespace => None,
        }
    }
}

pub struct SeqLexer;

impl Lexer for SeqLexer {
    type Token = SeqToken;

    fn tokenize(&self, input: &str) -> Result<Vec<SeqToken>, LexError> {
        tokenize(input, |t| matches!(t, SeqToken::Whitespace))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Seq(pub VecDeque<i64>);

impl fmt::Display for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", items.join(", "))
    }
}

pub const SEQ_GRAMMAR: &str = "
Items : num Items { Seq.List.prepend($1, $0); }
Items : _empty_string_ { new Seq.List(); }
";

pub fn seq_parser() -> Parser<Seq, SeqLexer> {
    let mut module = Module::new("seq");
    module
        .add_native::<Seq>("Seq.List")
        .constructor(&[], |_| Ok(Value::object(Seq::default())))
        .method("prepend", &[ValueKind::Int], |this, args| {
            let n = args.int(0)?;
            this.downcast_mut::<Seq>()
                .ok_or(InvokeError::Receiver { expected: "a list" })?
                .0
                .push_front(n);
            Ok(this.clone())
        });

    let registry = Registry::new([module]).unwrap();
    Parser::new(SEQ_GRAMMAR, SeqLexer, [("num", SeqToken::Num(0))], &registry).unwrap()
}
