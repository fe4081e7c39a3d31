//! Binary operator implementations for the evaluator.
//!
//! Dispatch is on the concrete operand pair. The type set is closed, so
//! pattern matching is preferred over trait objects:
//! - integer ⊕ integer: arithmetic, comparisons, bitwise ops
//! - string + string: concatenation
//! - `==` / `!=` on any other pair: structural or identity equality
//!
//! Everything else is a `TypeError` naming both operand types. `&&` and `||`
//! short-circuit and are handled by the interpreter before operands are
//! evaluated.

use kite_ir::BinaryOp;

use crate::errors::{
    binary_type_mismatch, division_by_zero, negative_shift_count, unreachable, EvalResult,
};
use crate::value::Value;

/// Evaluate a non-short-circuit binary operation.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Str(a), Value::Str(b)) if op == BinaryOp::Add => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a.as_str());
            joined.push_str(b.as_str());
            Ok(Value::string(joined))
        }
        _ => match op {
            BinaryOp::Eq => Ok(Value::Bool(left.equals(right))),
            BinaryOp::NotEq => Ok(Value::Bool(!left.equals(right))),
            BinaryOp::And | BinaryOp::Or => Err(unreachable(format!(
                "short-circuit operator {} reached eager dispatch",
                op.as_symbol()
            ))),
            _ => Err(binary_type_mismatch(
                op.as_symbol(),
                left.type_name(),
                right.type_name(),
            )),
        },
    }
}

/// Binary operations on integers. Arithmetic wraps like native 64-bit
/// two's complement.
fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    let value = match op {
        BinaryOp::Add => Value::Int(a.wrapping_add(b)),
        BinaryOp::Sub => Value::Int(a.wrapping_sub(b)),
        BinaryOp::Mul => Value::Int(a.wrapping_mul(b)),
        BinaryOp::Div => {
            if b == 0 {
                return Err(division_by_zero());
            }
            Value::Int(a.wrapping_div(b))
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Err(division_by_zero());
            }
            Value::Int(a.wrapping_rem(b))
        }
        BinaryOp::Eq => Value::Bool(a == b),
        BinaryOp::NotEq => Value::Bool(a != b),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::LtEq => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::GtEq => Value::Bool(a >= b),
        BinaryOp::BitAnd => Value::Int(a & b),
        BinaryOp::BitOr => Value::Int(a | b),
        BinaryOp::BitXor => Value::Int(a ^ b),
        BinaryOp::Shl => Value::Int(shift_left(a, b)?),
        BinaryOp::Shr => Value::Int(shift_right(a, b)?),
        BinaryOp::And | BinaryOp::Or => {
            return Err(unreachable(format!(
                "short-circuit operator {} reached eager dispatch",
                op.as_symbol()
            )))
        }
    };
    Ok(value)
}

/// `a << b`: bits shifted past the top are dropped.
fn shift_left(a: i64, b: i64) -> EvalResult<i64> {
    match u32::try_from(b) {
        Ok(count) if count < i64::BITS => Ok(a << count),
        Ok(_) => Ok(0),
        Err(_) if b < 0 => Err(negative_shift_count()),
        Err(_) => Ok(0),
    }
}

/// `a >> b`: arithmetic shift, sign-filling.
fn shift_right(a: i64, b: i64) -> EvalResult<i64> {
    match u32::try_from(b) {
        Ok(count) if count < i64::BITS => Ok(a >> count),
        Ok(_) => Ok(if a < 0 { -1 } else { 0 }),
        Err(_) if b < 0 => Err(negative_shift_count()),
        Err(_) => Ok(if a < 0 { -1 } else { 0 }),
    }
}
