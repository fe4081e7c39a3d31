//! Unary operator implementations for the evaluator.

use kite_ir::UnaryOp;

use crate::errors::{unary_type_mismatch, EvalResult};
use crate::value::Value;

/// Evaluate a unary operation.
///
/// `-` and `~` take integers (negation wraps); `!` negates truthiness of any
/// value.
pub fn evaluate_unary(value: &Value, op: UnaryOp) -> EvalResult {
    match (value, op) {
        (Value::Int(n), UnaryOp::Neg) => Ok(Value::Int(n.wrapping_neg())),
        (Value::Int(n), UnaryOp::BitNot) => Ok(Value::Int(!*n)),
        (_, UnaryOp::Not) => Ok(Value::Bool(!value.is_truthy())),
        _ => Err(unary_type_mismatch(op.as_symbol(), value.type_name())),
    }
}
