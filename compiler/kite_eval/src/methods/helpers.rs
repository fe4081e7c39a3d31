//! Argument validation and index arithmetic shared by builtins and methods.

use crate::errors::{type_mismatch, EvalError};
use crate::value::Value;

fn argument_context(callable: &str, index: usize) -> String {
    format!("{callable}() argument {}", index + 1)
}

/// Extract a string argument at the given index.
#[inline]
pub fn require_str_arg<'a>(
    callable: &str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a str, EvalError> {
    match args.get(index) {
        Some(Value::Str(s)) => Ok(s.as_str()),
        other => Err(type_mismatch(
            &argument_context(callable, index),
            "string",
            other.map_or("nothing", Value::type_name),
        )),
    }
}

/// Extract an integer argument at the given index.
#[inline]
pub fn require_int_arg(callable: &str, args: &[Value], index: usize) -> Result<i64, EvalError> {
    match args.get(index) {
        Some(Value::Int(n)) => Ok(*n),
        other => Err(type_mismatch(
            &argument_context(callable, index),
            "integer",
            other.map_or("nothing", Value::type_name),
        )),
    }
}

/// Extract an optional integer argument; absent or `null` is `None`.
#[inline]
pub fn optional_int_arg(
    callable: &str,
    args: &[Value],
    index: usize,
) -> Result<Option<i64>, EvalError> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => require_int_arg(callable, args, index).map(Some),
    }
}

/// Extract an optional string argument; absent or `null` is `None`.
#[inline]
pub fn optional_str_arg<'a>(
    callable: &str,
    args: &'a [Value],
    index: usize,
) -> Result<Option<&'a str>, EvalError> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => require_str_arg(callable, args, index).map(Some),
    }
}

/// Convert a length to an integer value.
#[inline]
pub fn len_to_value(len: usize) -> Value {
    Value::Int(i64::try_from(len).unwrap_or(i64::MAX))
}

/// Resolve an element index against `len`: negative counts from the end.
/// `None` when out of range on either side.
pub fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { index + len } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

/// Resolve a slice bound against `len`: negative counts from the end, then
/// the result is clamped to `0..=len`.
pub fn clamp_bound(bound: i64, len: usize) -> usize {
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if bound < 0 {
        bound.saturating_add(signed_len)
    } else {
        bound
    };
    usize::try_from(resolved.clamp(0, signed_len)).unwrap_or(0)
}

/// Python-style `[start:end]` window over `len` items. `start` may exceed
/// `end`, which denotes an empty window.
pub fn slice_window(start: Option<i64>, end: Option<i64>, len: usize) -> (usize, usize) {
    let start = start.map_or(0, |s| clamp_bound(s, len));
    let end = end.map_or(len, |e| clamp_bound(e, len));
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_negative_and_out_of_range() {
        assert_eq!(normalize_index(-1, 3), Some(2));
        assert_eq!(normalize_index(0, 3), Some(0));
        assert_eq!(normalize_index(3, 3), None);
        assert_eq!(normalize_index(-4, 3), None);
        assert_eq!(normalize_index(0, 0), None);
    }

    #[test]
    fn slice_bounds_clamp() {
        assert_eq!(slice_window(None, None, 5), (0, 5));
        assert_eq!(slice_window(Some(-2), None, 5), (3, 5));
        assert_eq!(slice_window(Some(-10), Some(100), 5), (0, 5));
        assert_eq!(slice_window(Some(4), Some(1), 5), (4, 1));
        assert_eq!(clamp_bound(i64::MIN, 5), 0);
    }

    #[test]
    fn argument_type_errors_name_position() {
        let args = [Value::int(1)];
        let err = require_str_arg("find", &args, 0);
        assert_eq!(
            err.map_err(|e| e.message),
            Err("find() argument 1 expects string, got 'integer'".to_string())
        );
        assert_eq!(optional_int_arg("pop", &[], 0), Ok(None));
        assert_eq!(optional_int_arg("pop", &[Value::Null], 0), Ok(None));
    }
}
