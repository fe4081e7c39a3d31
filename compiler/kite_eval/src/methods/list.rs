//! Native list methods. All of them mutate the receiver in place.

use crate::errors::{
    pop_from_empty_list, pop_index_out_of_range, type_mismatch, unreachable, EvalResult,
};
use crate::value::{Shared, Value};

use super::helpers::{clamp_bound, normalize_index, optional_int_arg, require_int_arg};

pub(super) fn dispatch_list_method(
    list: &Shared<Vec<Value>>,
    method: &str,
    args: &[Value],
) -> EvalResult {
    match method {
        "append" => {
            let item = args.first().cloned().unwrap_or(Value::Null);
            list.borrow_mut().push(item);
            Ok(Value::Null)
        }
        "extend" => extend(list, args),
        "insert" => {
            let index = require_int_arg("insert", args, 0)?;
            let item = args.get(1).cloned().unwrap_or(Value::Null);
            let mut items = list.borrow_mut();
            let at = clamp_bound(index, items.len());
            items.insert(at, item);
            Ok(Value::Null)
        }
        "pop" => pop(list, args),
        "reverse" => {
            list.borrow_mut().reverse();
            Ok(Value::Null)
        }
        _ => Err(unreachable(format!(
            "list method '{method}' is listed but not dispatched"
        ))),
    }
}

fn extend(list: &Shared<Vec<Value>>, args: &[Value]) -> EvalResult {
    // Collect before borrowing the receiver mutably: `xs.extend(xs)` aliases.
    let items: Vec<Value> = match args.first() {
        Some(Value::List(other)) => other.borrow().clone(),
        Some(Value::Str(text)) => text.chars().map(|c| Value::string(c.to_string())).collect(),
        Some(Value::Dict(dict)) => dict.borrow().iter().map(|entry| entry.key.clone()).collect(),
        other => {
            return Err(type_mismatch(
                "extend() argument 1",
                "an iterable",
                other.map_or("nothing", Value::type_name),
            ))
        }
    };
    list.borrow_mut().extend(items);
    Ok(Value::Null)
}

fn pop(list: &Shared<Vec<Value>>, args: &[Value]) -> EvalResult {
    let requested = optional_int_arg("pop", args, 0)?;
    let mut items = list.borrow_mut();
    if items.is_empty() {
        return Err(pop_from_empty_list());
    }
    let index = requested.unwrap_or(-1);
    match normalize_index(index, items.len()) {
        Some(at) => Ok(items.remove(at)),
        None => Err(pop_index_out_of_range(index)),
    }
}
