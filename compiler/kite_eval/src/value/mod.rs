//! Runtime values for the Kite interpreter.
//!
//! # Heap Enforcement
//!
//! All heap allocations go through factory methods on `Value`. `Heap<T>` and
//! `Shared<T>` have crate-private constructors, so hosts build values with
//! `Value::string(..)`, `Value::list(..)`, `Value::dict(..)` and friends.
//!
//! # Ownership
//!
//! Lists, dictionaries, instances, classes and modules are reference types:
//! cloning a `Value` aliases the same object. Strings and integers behave as
//! immutable values. Everything is `Rc`-based; a session is single-threaded.

mod dict;
mod function;
mod hash_key;
mod heap;
mod printing;
mod string;

use std::fmt;

use rustc_hash::FxHashSet;

pub use dict::{Dict, DictEntry};
pub use function::{BoundMethod, BuiltinFn, BuiltinFunction, BuiltinMethod, FunctionValue};
pub use hash_key::HashKey;
pub use heap::{Heap, Shared, Teardown};
pub(crate) use heap::release;
pub use string::StrValue;

use crate::class::{Class, Instance};
use crate::errors::EvalError;
use crate::module::Module;

/// Stable type tag, used for dispatch, hashing and error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Integer,
    String,
    Boolean,
    Null,
    List,
    Dictionary,
    Function,
    Builtin,
    Class,
    Instance,
    Method,
    Module,
    Error,
}

impl TypeTag {
    /// The name `type(x)` reports.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Integer => "integer",
            TypeTag::String => "string",
            TypeTag::Boolean => "boolean",
            TypeTag::Null => "null",
            TypeTag::List => "list",
            TypeTag::Dictionary => "dictionary",
            TypeTag::Function => "function",
            TypeTag::Builtin => "builtin",
            TypeTag::Class => "class",
            TypeTag::Instance => "instance",
            TypeTag::Method => "method",
            TypeTag::Module => "module",
            TypeTag::Error => "error",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime value in the Kite interpreter.
///
/// Control signals (`return`, `break`, `continue`) are not values; statement
/// execution reports them through `ControlFlow`.
#[derive(Clone)]
pub enum Value {
    // Scalars
    /// 64-bit signed integer.
    Int(i64),
    /// Immutable string.
    Str(Heap<StrValue>),
    /// Boolean.
    Bool(bool),
    /// Null.
    Null,

    // Containers (mutable, shared)
    /// Ordered list.
    List(Shared<Vec<Value>>),
    /// Dictionary keyed by `HashKey`.
    Dict(Shared<Dict>),

    // Callables
    /// User function with its captured environment.
    Function(Heap<FunctionValue>),
    /// Native free function.
    Builtin(&'static BuiltinFunction),
    /// Native method bound to a string, list or dictionary receiver.
    BuiltinMethod(Heap<BuiltinMethod>),
    /// User method bound to an instance or class receiver.
    BoundMethod(Heap<BoundMethod>),

    // Objects
    /// Class.
    Class(Class),
    /// Class instance.
    Instance(Instance),
    /// Imported module.
    Module(Module),

    /// Error surfaced to the host.
    Error(Heap<EvalError>),
}

// Factory Methods

impl Value {
    /// Create an integer value.
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    /// Create a string value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(StrValue::new(s.into())))
    }

    /// Create a list value.
    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Shared::new(items))
    }

    /// Create a dictionary value.
    #[inline]
    pub fn dict(dict: Dict) -> Self {
        Value::Dict(Shared::new(dict))
    }

    /// Create an error value.
    #[inline]
    pub fn error(err: EvalError) -> Self {
        Value::Error(Heap::new(err))
    }

    /// Create a user function value.
    #[inline]
    pub fn function(func: FunctionValue) -> Self {
        Value::Function(Heap::new(func))
    }

    /// Bind a native method to its receiver.
    #[inline]
    pub fn builtin_method(receiver: Value, name: &'static str) -> Self {
        Value::BuiltinMethod(Heap::new(BuiltinMethod { receiver, name }))
    }

    /// Bind a user method to its receiver.
    #[inline]
    pub fn bound_method(receiver: Value, function: Heap<FunctionValue>, owner: Class) -> Self {
        Value::BoundMethod(Heap::new(BoundMethod {
            receiver,
            function,
            owner,
        }))
    }
}

// Inspection

impl Value {
    /// Type tag of this value.
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Int(_) => TypeTag::Integer,
            Value::Str(_) => TypeTag::String,
            Value::Bool(_) => TypeTag::Boolean,
            Value::Null => TypeTag::Null,
            Value::List(_) => TypeTag::List,
            Value::Dict(_) => TypeTag::Dictionary,
            Value::Function(_) => TypeTag::Function,
            Value::Builtin(_) | Value::BuiltinMethod(_) => TypeTag::Builtin,
            Value::BoundMethod(_) => TypeTag::Method,
            Value::Class(_) => TypeTag::Class,
            Value::Instance(_) => TypeTag::Instance,
            Value::Module(_) => TypeTag::Module,
            Value::Error(_) => TypeTag::Error,
        }
    }

    /// Type name for messages.
    pub fn type_name(&self) -> &'static str {
        self.tag().as_str()
    }

    /// Kite truthiness: `false`, `null`, `0`, `""`, `[]` and `{}` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Null => false,
            Value::Int(n) => *n != 0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Dict(dict) => !dict.borrow().is_empty(),
            _ => true,
        }
    }

    /// Try to get as integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get as boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether this value is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Whether two values are the same object.
    ///
    /// Scalars compare by value; everything else by allocation.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => a.ptr_eq(b) || a.as_str() == b.as_str(),
            (Value::List(a), Value::List(b)) => a.ptr_eq(b),
            (Value::Dict(a), Value::Dict(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Builtin(a), Value::Builtin(b)) => std::ptr::eq(*a, *b),
            (Value::BuiltinMethod(a), Value::BuiltinMethod(b)) => {
                a.ptr_eq(b) || (a.name == b.name && a.receiver.is_identical(&b.receiver))
            }
            (Value::BoundMethod(a), Value::BoundMethod(b)) => {
                a.ptr_eq(b)
                    || (a.function.ptr_eq(&b.function) && a.receiver.is_identical(&b.receiver))
            }
            (Value::Class(a), Value::Class(b)) => a.ptr_eq(b),
            (Value::Instance(a), Value::Instance(b)) => a.ptr_eq(b),
            (Value::Module(a), Value::Module(b)) => a.ptr_eq(b),
            (Value::Error(a), Value::Error(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Structural equality (`==`). Terminates on self-referential containers.
    pub fn equals(&self, other: &Value) -> bool {
        printing::structural_eq(self, other, &mut FxHashSet::default())
    }

    /// Display form used by `print` and string formatting.
    ///
    /// Strings render raw at the top level and quoted inside containers.
    pub fn display_value(&self) -> String {
        let mut out = String::new();
        printing::write_value(&mut out, self, false, &mut FxHashSet::default());
        out
    }

    /// Printable form with strings quoted, used in messages (`KeyError`).
    pub fn repr(&self) -> String {
        let mut out = String::new();
        printing::write_value(&mut out, self, true, &mut FxHashSet::default());
        out
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.type_name(), self.repr())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_value())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<EvalError> for Value {
    fn from(err: EvalError) -> Self {
        Value::error(err)
    }
}
