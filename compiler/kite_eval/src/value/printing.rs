//! Cycle-safe printing and structural equality.
//!
//! Lists and dictionaries may contain themselves. Printing tracks the
//! containers on the current path and renders `[...]` / `{...}` for a repeated
//! reference. Equality tracks the container pairs already under comparison and
//! treats a revisited pair as equal.

use std::fmt::Write;

use kite_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;

use super::Value;

pub(super) fn write_value(out: &mut String, value: &Value, quote: bool, path: &mut FxHashSet<usize>) {
    match value {
        Value::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Str(s) => {
            if quote {
                let _ = write!(out, "{:?}", s.as_str());
            } else {
                out.push_str(s.as_str());
            }
        }
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Null => out.push_str("null"),
        Value::List(items) => {
            let addr = items.addr();
            if path.contains(&addr) {
                out.push_str("[...]");
                return;
            }
            path.insert(addr);
            out.push('[');
            for (i, item) in items.borrow().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                ensure_sufficient_stack(|| write_value(out, item, true, path));
            }
            out.push(']');
            path.remove(&addr);
        }
        Value::Dict(dict) => {
            let addr = dict.addr();
            if path.contains(&addr) {
                out.push_str("{...}");
                return;
            }
            path.insert(addr);
            out.push('{');
            for (i, entry) in dict.borrow().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                ensure_sufficient_stack(|| {
                    write_value(out, &entry.key, true, path);
                    out.push_str(": ");
                    write_value(out, &entry.value, true, path);
                });
            }
            out.push('}');
            path.remove(&addr);
        }
        Value::Function(func) => {
            let _ = write!(out, "<function {}>", func.name());
        }
        Value::Builtin(builtin) => {
            let _ = write!(out, "<builtin {}>", builtin.name);
        }
        Value::BuiltinMethod(method) => {
            let _ = write!(
                out,
                "<builtin method {}.{}>",
                method.receiver.type_name(),
                method.name
            );
        }
        Value::BoundMethod(method) => {
            let _ = write!(
                out,
                "<method {}.{}>",
                method.owner.name(),
                method.function.name()
            );
        }
        Value::Class(class) => {
            let _ = write!(out, "<class {}>", class.name());
        }
        Value::Instance(instance) => {
            let _ = write!(out, "<{} instance>", instance.class().name());
        }
        Value::Module(module) => {
            let _ = write!(out, "<module {}>", module.path().display());
        }
        Value::Error(err) => {
            let _ = write!(out, "{err}");
        }
    }
}

pub(super) fn structural_eq(a: &Value, b: &Value, seen: &mut FxHashSet<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => x.as_str() == y.as_str(),
        (Value::List(x), Value::List(y)) => {
            if x.ptr_eq(y) {
                return true;
            }
            let pair = (x.addr(), y.addr());
            if seen.contains(&pair) {
                return true;
            }
            let xs = x.borrow();
            let ys = y.borrow();
            if xs.len() != ys.len() {
                return false;
            }
            seen.insert(pair);
            let equal = xs
                .iter()
                .zip(ys.iter())
                .all(|(l, r)| ensure_sufficient_stack(|| structural_eq(l, r, seen)));
            seen.remove(&pair);
            equal
        }
        (Value::Dict(x), Value::Dict(y)) => {
            if x.ptr_eq(y) {
                return true;
            }
            let pair = (x.addr(), y.addr());
            if seen.contains(&pair) {
                return true;
            }
            let xd = x.borrow();
            let yd = y.borrow();
            if xd.len() != yd.len() {
                return false;
            }
            seen.insert(pair);
            let equal = xd.iter().all(|entry| {
                // Keys in a dictionary are always hashable.
                let Ok(key) = entry.key.hash_key() else {
                    return false;
                };
                yd.get(&key).is_some_and(|other| {
                    ensure_sufficient_stack(|| structural_eq(&entry.value, other, seen))
                })
            });
            seen.remove(&pair);
            equal
        }
        _ => a.is_identical(b),
    }
}
