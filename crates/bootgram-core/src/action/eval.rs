//! Evaluation of resolved rule expressions.

use crate::Value;
use crate::registry::CallError;

use super::RuleExpression;

/// Failure while evaluating a rule action.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("variable ${index} is out of range: the rule has {len} results")]
    VariableOutOfRange { index: usize, len: usize },

    #[error("receiver of `{method}` must be {expected}, found {found}")]
    ReceiverType {
        method: String,
        expected: String,
        found: &'static str,
    },

    #[error("rule action produced null")]
    NullResult,

    #[error(transparent)]
    Call(#[from] CallError),
}

/// Evaluates one expression over the parse results of a rule.
pub fn evaluate(expr: &RuleExpression, results: &[Value]) -> Result<Value, EvalError> {
    let evaluate_all = |args: &[RuleExpression]| -> Result<Vec<Value>, EvalError> {
        args.iter().map(|a| evaluate(a, results)).collect()
    };

    match expr {
        RuleExpression::Constant(literal) => Ok(literal.to_value()),
        RuleExpression::Variable(index) => {
            results
                .get(*index)
                .cloned()
                .ok_or(EvalError::VariableOutOfRange {
                    index: *index,
                    len: results.len(),
                })
        }
        RuleExpression::ConstructorCall { constructors, args } => {
            let args = evaluate_all(args)?;
            Ok(constructors.invoke(None, &args)?)
        }
        RuleExpression::StaticCall { method, args } => {
            let args = evaluate_all(args)?;
            Ok(method.invoke(None, &args)?)
        }
        RuleExpression::InstanceCall {
            method,
            context,
            args,
        } => {
            let this = evaluate(context, results)?;
            let compatible = method.receiver().is_some_and(|kind| kind.admits(&this));
            if !compatible {
                return Err(EvalError::ReceiverType {
                    method: method.name().to_string(),
                    expected: method
                        .receiver()
                        .map_or_else(|| "an instance (type has none)".to_string(), |k| k.to_string()),
                    found: this.type_name(),
                });
            }
            let args = evaluate_all(args)?;
            Ok(method.invoke(Some(&this), &args)?)
        }
    }
}
