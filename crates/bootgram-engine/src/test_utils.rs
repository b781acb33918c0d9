//! Fixtures shared by the engine tests.

use bootgram_core::{
    EMPTY_STRING, ExprTemplate, Grammar, GrammarBuilder, InvokeError, Module, Registry, Token,
    Value, ValueKind,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Tok {
    Int(i64),
    Plus,
    Star,
    LParen,
    RParen,
}

impl Token for Tok {
    fn is_compatible(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    fn value(&self) -> Option<Value> {
        match self {
            Self::Int(n) => Some(Value::Int(*n)),
            _ => None,
        }
    }
}

pub fn registry() -> Registry {
    let mut module = Module::new("calc");
    module
        .add_type("Calc")
        .static_method("add", &[ValueKind::Int, ValueKind::Int], |args| {
            Ok(Value::Int(args.int(0)? + args.int(1)?))
        })
        .static_method("mul", &[ValueKind::Int, ValueKind::Int], |args| {
            Ok(Value::Int(args.int(0)? * args.int(1)?))
        })
        .static_method("fail", &[ValueKind::Int], |_| {
            Err(InvokeError::failed("boom"))
        });
    Registry::new([module]).unwrap()
}

pub fn var(index: usize) -> ExprTemplate {
    ExprTemplate::variable(index)
}

pub fn call(method: &str, args: Vec<ExprTemplate>) -> ExprTemplate {
    ExprTemplate::call(method, args)
}

/// Builds a grammar over the `Tok` terminals (`int`, `plus`, `star`, `lparen`, `rparen`).
pub fn grammar(rules: &[(&str, &[&str], ExprTemplate)]) -> Grammar<Tok> {
    let mut b = GrammarBuilder::new();
    b.register_terminal("int", Tok::Int(0)).unwrap();
    b.register_terminal("plus", Tok::Plus).unwrap();
    b.register_terminal("star", Tok::Star).unwrap();
    b.register_terminal("lparen", Tok::LParen).unwrap();
    b.register_terminal("rparen", Tok::RParen).unwrap();
    for (nt, symbols, action) in rules {
        b.register_rule(nt, symbols.iter().copied(), vec![action.clone()])
            .unwrap();
    }
    b.build(&registry()).unwrap()
}

/// Sums and products with the usual precedence, folded right to left.
pub fn arithmetic() -> Grammar<Tok> {
    grammar(&[
        ("Sum", &["Term", "SumTail"], call("Calc.add", vec![var(0), var(1)])),
        ("SumTail", &["plus", "Term", "SumTail"], call("Calc.add", vec![var(1), var(2)])),
        ("SumTail", &[EMPTY_STRING], ExprTemplate::constant(0_i64)),
        ("Term", &["Atom", "TermTail"], call("Calc.mul", vec![var(0), var(1)])),
        ("TermTail", &["star", "Atom", "TermTail"], call("Calc.mul", vec![var(1), var(2)])),
        ("TermTail", &[EMPTY_STRING], ExprTemplate::constant(1_i64)),
        ("Atom", &["int"], var(0)),
        ("Atom", &["lparen", "Sum", "rparen"], var(1)),
    ])
}

/// `List : int List | ε`, summing its items.
pub fn list() -> Grammar<Tok> {
    grammar(&[
        ("List", &["int", "List"], call("Calc.add", vec![var(0), var(1)])),
        ("List", &[EMPTY_STRING], ExprTemplate::constant(0_i64)),
    ])
}
