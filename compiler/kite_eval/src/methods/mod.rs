//! Native methods on strings and lists.
//!
//! `receiver.name` on a string or list produces a `BuiltinMethod` bound to
//! the receiver; calling it checks the arity from the method table, then
//! dispatches here. Dictionaries have no native methods: attribute syntax on
//! a dictionary reads and writes string keys.

mod format;
mod helpers;
mod list;
mod string;

pub use format::format_template;
pub use helpers::{normalize_index, require_int_arg};

use crate::errors::{unreachable, wrong_arg_count, ArgCount, EvalResult};
use crate::value::{TypeTag, Value};

/// A native method and the arguments it accepts.
#[derive(Clone, Copy, Debug)]
pub struct MethodSpec {
    pub name: &'static str,
    pub arity: ArgCount,
}

const fn spec(name: &'static str, arity: ArgCount) -> MethodSpec {
    MethodSpec { name, arity }
}

/// String methods, sorted by name.
pub const STRING_METHODS: &[MethodSpec] = &[
    spec("capitalize", ArgCount::Exact(0)),
    spec("count", ArgCount::Range(1, 3)),
    spec("endswith", ArgCount::Range(1, 3)),
    spec("find", ArgCount::Range(1, 3)),
    spec("format", ArgCount::AtLeast(0)),
    spec("join", ArgCount::Exact(1)),
    spec("lower", ArgCount::Exact(0)),
    spec("lstrip", ArgCount::Range(0, 1)),
    spec("rstrip", ArgCount::Range(0, 1)),
    spec("split", ArgCount::Range(0, 2)),
    spec("startswith", ArgCount::Range(1, 3)),
    spec("strip", ArgCount::Range(0, 1)),
    spec("swapcase", ArgCount::Exact(0)),
    spec("title", ArgCount::Exact(0)),
    spec("upper", ArgCount::Exact(0)),
];

/// List methods, sorted by name.
pub const LIST_METHODS: &[MethodSpec] = &[
    spec("append", ArgCount::Exact(1)),
    spec("extend", ArgCount::Exact(1)),
    spec("insert", ArgCount::Exact(2)),
    spec("pop", ArgCount::Range(0, 1)),
    spec("reverse", ArgCount::Exact(0)),
];

fn methods_for(tag: TypeTag) -> &'static [MethodSpec] {
    match tag {
        TypeTag::String => STRING_METHODS,
        TypeTag::List => LIST_METHODS,
        _ => &[],
    }
}

/// Look up a native method of `receiver`'s type.
pub fn lookup_method(receiver: &Value, name: &str) -> Option<&'static MethodSpec> {
    methods_for(receiver.tag())
        .binary_search_by(|spec| spec.name.cmp(name))
        .ok()
        .and_then(|index| methods_for(receiver.tag()).get(index))
}

/// Call a native method on its receiver.
pub fn call_builtin_method(receiver: &Value, method: &str, args: &[Value]) -> EvalResult {
    let Some(spec) = lookup_method(receiver, method) else {
        return Err(unreachable(format!(
            "no native method '{method}' on {}",
            receiver.type_name()
        )));
    };
    if !spec.arity.accepts(args.len()) {
        return Err(wrong_arg_count(spec.name, spec.arity, args.len()));
    }
    match receiver {
        Value::Str(s) => string::dispatch_string_method(s, spec.name, args),
        Value::List(items) => list::dispatch_list_method(items, spec.name, args),
        _ => Err(unreachable(format!(
            "native method '{method}' bound to {}",
            receiver.type_name()
        ))),
    }
}
