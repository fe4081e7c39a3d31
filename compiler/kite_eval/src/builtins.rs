//! Builtin free functions.
//!
//! Identifier resolution falls back to this table when a name is bound in no
//! scope, so a script can shadow any builtin.

use crate::errors::{type_mismatch, ArgCount, EvalError, EvalErrorKind, EvalResult};
use crate::interpreter::Interpreter;
use crate::methods::require_int_arg;
use crate::value::{BuiltinFunction, Value};

static BUILTINS: [BuiltinFunction; 7] = [
    BuiltinFunction {
        name: "abs",
        arity: ArgCount::Exact(1),
        func: builtin_abs,
    },
    BuiltinFunction {
        name: "bin",
        arity: ArgCount::Exact(1),
        func: builtin_bin,
    },
    BuiltinFunction {
        name: "hex",
        arity: ArgCount::Exact(1),
        func: builtin_hex,
    },
    BuiltinFunction {
        name: "len",
        arity: ArgCount::Exact(1),
        func: builtin_len,
    },
    BuiltinFunction {
        name: "oct",
        arity: ArgCount::Exact(1),
        func: builtin_oct,
    },
    BuiltinFunction {
        name: "print",
        arity: ArgCount::AtLeast(0),
        func: builtin_print,
    },
    BuiltinFunction {
        name: "type",
        arity: ArgCount::Exact(1),
        func: builtin_type,
    },
];

/// Find a builtin by name.
pub fn lookup_builtin(name: &str) -> Option<&'static BuiltinFunction> {
    BUILTINS.iter().find(|builtin| builtin.name == name)
}

/// Names of all builtins.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|builtin| builtin.name)
}

fn builtin_abs(_: &Interpreter, args: &[Value]) -> EvalResult {
    let n = require_int_arg("abs", args, 0)?;
    Ok(Value::int(n.wrapping_abs()))
}

/// Render `n` in a base with a prefix, sign first: `-0b101`.
fn with_radix(n: i64, prefix: &str, digits: fn(u64) -> String) -> Value {
    let sign = if n < 0 { "-" } else { "" };
    Value::string(format!("{sign}{prefix}{}", digits(n.unsigned_abs())))
}

fn builtin_bin(_: &Interpreter, args: &[Value]) -> EvalResult {
    let n = require_int_arg("bin", args, 0)?;
    Ok(with_radix(n, "0b", |m| format!("{m:b}")))
}

fn builtin_oct(_: &Interpreter, args: &[Value]) -> EvalResult {
    let n = require_int_arg("oct", args, 0)?;
    Ok(with_radix(n, "0o", |m| format!("{m:o}")))
}

fn builtin_hex(_: &Interpreter, args: &[Value]) -> EvalResult {
    let n = require_int_arg("hex", args, 0)?;
    Ok(with_radix(n, "0x", |m| format!("{m:x}")))
}

fn builtin_len(_: &Interpreter, args: &[Value]) -> EvalResult {
    let len = match args.first() {
        Some(Value::Str(s)) => s.char_len(),
        Some(Value::List(items)) => items.borrow().len(),
        Some(Value::Dict(dict)) => dict.borrow().len(),
        other => {
            return Err(type_mismatch(
                "len()",
                "a string, list or dictionary",
                other.map_or("nothing", Value::type_name),
            ))
        }
    };
    Ok(Value::int(i64::try_from(len).unwrap_or(i64::MAX)))
}

fn builtin_type(_: &Interpreter, args: &[Value]) -> EvalResult {
    Ok(Value::string(
        args.first().map_or("null", Value::type_name),
    ))
}

fn builtin_print(interp: &Interpreter, args: &[Value]) -> EvalResult {
    let line = args
        .iter()
        .map(Value::display_value)
        .collect::<Vec<_>>()
        .join(" ");
    interp.print_handler().write_line(&line).map_err(|err| {
        EvalError::from_kind(EvalErrorKind::Io {
            path: "<stdout>".to_string(),
            message: err.to_string(),
        })
    })?;
    Ok(Value::Null)
}
