//! Grammar definitions as read from grammar text, and the native types the
//! meta grammar's actions build them with.

use std::collections::VecDeque;

use bootgram_core::{
    ExprTemplate, GrammarBuilder, GrammarError, InvokeError, Literal, Module, Token, Value,
    ValueKind,
};

/// A grammar as written in grammar text, not yet bound to any token type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrammarDefinition {
    rules: Vec<RuleDefinition>,
    start: Option<String>,
}

impl GrammarDefinition {
    /// Rules in source order.
    pub fn rules(&self) -> &[RuleDefinition] {
        &self.rules
    }

    /// The left-hand side of the first rule.
    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    /// Registers every rule into `builder` and selects the start symbol.
    ///
    /// Terminals must be registered beforehand; every name that is not a
    /// terminal is taken to be a non-terminal.
    pub fn replay<Tok: Token>(&self, builder: &mut GrammarBuilder<Tok>) -> Result<(), GrammarError> {
        for rule in &self.rules {
            builder.register_rule(
                &rule.nonterminal,
                rule.symbols.iter().cloned(),
                rule.action.clone(),
            )?;
        }
        if let Some(start) = &self.start {
            builder.set_start(start)?;
        }
        Ok(())
    }
}

/// One `Name : symbols { action }` line.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDefinition {
    pub nonterminal: String,
    pub symbols: Vec<String>,
    pub action: Vec<ExprTemplate>,
}

#[derive(Debug, Clone, Default)]
struct Names(VecDeque<String>);

impl Names {
    fn dotted(&self) -> String {
        self.0.iter().map(String::as_str).collect::<Vec<_>>().join(".")
    }
}

#[derive(Debug, Clone, Default)]
struct Exprs(VecDeque<ExprTemplate>);

/// Types used by the meta grammar's actions.
///
/// Lists grow at the front: the meta grammar is right-recursive, so the
/// innermost (last) element is built first.
pub(crate) fn meta_module() -> Module {
    let mut module = Module::new("bootgram.meta");

    module
        .add_native::<GrammarDefinition>("Meta.Definition")
        .constructor(&[], |_| Ok(Value::object(GrammarDefinition::default())))
        .method(
            "add_rule",
            &[ValueKind::native::<RuleDefinition>()],
            |this, args| {
                let rule = args.extract::<RuleDefinition>(0)?;
                receiver::<GrammarDefinition>(this)?.rules.insert(0, rule);
                Ok(this.clone())
            },
        )
        .method(
            "set_start",
            &[ValueKind::native::<RuleDefinition>()],
            |this, args| {
                let rule = args.extract::<RuleDefinition>(0)?;
                receiver::<GrammarDefinition>(this)?.start = Some(rule.nonterminal);
                Ok(this.clone())
            },
        );

    module.add_native::<RuleDefinition>("Meta.Rule").constructor(
        &[
            ValueKind::Str,
            ValueKind::native::<Names>(),
            ValueKind::native::<Exprs>(),
        ],
        |args| {
            Ok(Value::object(RuleDefinition {
                nonterminal: args.str(0)?.to_string(),
                symbols: args.extract::<Names>(1)?.0.into(),
                action: args.extract::<Exprs>(2)?.0.into(),
            }))
        },
    );

    module
        .add_native::<Names>("Meta.Names")
        .constructor(&[], |_| Ok(Value::object(Names::default())))
        .method("prepend", &[ValueKind::Str], |this, args| {
            let name = args.str(0)?.to_string();
            receiver::<Names>(this)?.0.push_front(name);
            Ok(this.clone())
        });

    module
        .add_native::<Exprs>("Meta.Exprs")
        .constructor(&[], |_| Ok(Value::object(Exprs::default())))
        .method(
            "prepend",
            &[ValueKind::native::<ExprTemplate>()],
            |this, args| {
                let expr = args.extract::<ExprTemplate>(0)?;
                receiver::<Exprs>(this)?.0.push_front(expr);
                Ok(this.clone())
            },
        );

    let names = ValueKind::native::<Names>();
    let exprs = ValueKind::native::<Exprs>();
    let expr = ValueKind::native::<ExprTemplate>();
    module
        .add_native::<ExprTemplate>("Meta.Expr")
        .static_method("construct", &[names, exprs], |args| {
            let name = args.extract::<Names>(0)?.dotted();
            let exprs = args.extract::<Exprs>(1)?;
            Ok(Value::object(ExprTemplate::construct(name, exprs.0.into())))
        })
        .static_method("call", &[names, exprs], |args| {
            let name = args.extract::<Names>(0)?.dotted();
            let exprs = args.extract::<Exprs>(1)?;
            Ok(Value::object(ExprTemplate::call(name, exprs.0.into())))
        })
        .static_method("invoke", &[names, expr, exprs], |args| {
            let name = args.extract::<Names>(0)?.dotted();
            let context = args.extract::<ExprTemplate>(1)?;
            let exprs = args.extract::<Exprs>(2)?;
            Ok(Value::object(ExprTemplate::invoke(
                name,
                context,
                exprs.0.into(),
            )))
        })
        .static_method("variable", &[ValueKind::Int], |args| {
            let index = usize::try_from(args.int(0)?)
                .map_err(|_| InvokeError::failed("variable index out of range"))?;
            Ok(Value::object(ExprTemplate::variable(index)))
        })
        .static_method("constant", &[ValueKind::Any], |args| {
            let literal = Literal::from_value(args.get(0)?).ok_or(InvokeError::Argument {
                index: 0,
                expected: "a literal",
            })?;
            Ok(Value::object(ExprTemplate::Constant(literal)))
        });

    module
}

fn receiver<T: 'static>(this: &Value) -> Result<std::cell::RefMut<'_, T>, InvokeError> {
    this.downcast_mut::<T>().ok_or(InvokeError::Receiver {
        expected: std::any::type_name::<T>(),
    })
}
