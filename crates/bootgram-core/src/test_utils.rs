//! Fixtures shared by the grammar tests.

use crate::{ExprTemplate, GrammarBuilder, Module, Registry, Token, Value, ValueKind};

/// Numbers carry a payload, punctuation is matched by character.
#[derive(Debug, Clone, PartialEq)]
pub enum TestToken {
    Num(i64),
    Punct(char),
}

impl Token for TestToken {
    fn is_compatible(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Num(_), Self::Num(_)) => true,
            (Self::Punct(a), Self::Punct(b)) => a == b,
            _ => false,
        }
    }

    fn value(&self) -> Option<Value> {
        match self {
            Self::Num(n) => Some(Value::Int(*n)),
            Self::Punct(_) => None,
        }
    }
}

/// Builder with `num`, `plus`, `lparen` and `rparen` registered.
pub fn builder() -> GrammarBuilder<TestToken> {
    let mut builder = GrammarBuilder::new();
    builder.register_terminal("num", TestToken::Num(0)).unwrap();
    builder.register_terminal("plus", TestToken::Punct('+')).unwrap();
    builder.register_terminal("lparen", TestToken::Punct('(')).unwrap();
    builder.register_terminal("rparen", TestToken::Punct(')')).unwrap();
    builder
}

pub fn registry() -> Registry {
    let mut module = Module::new("test");
    module
        .add_type("Test.Math")
        .static_method("add", &[ValueKind::Int, ValueKind::Int], |args| {
            Ok(Value::Int(args.int(0)? + args.int(1)?))
        });
    Registry::new([module]).unwrap()
}

/// `$index` as a one-expression action.
pub fn pass(index: usize) -> Vec<ExprTemplate> {
    vec![ExprTemplate::variable(index)]
}
