//! Callable payloads.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use kite_ir::FunctionDef;

use super::Value;
use crate::class::Class;
use crate::environment::Environment;
use crate::errors::{ArgCount, EvalResult};
use crate::interpreter::Interpreter;

/// Native function signature.
///
/// Arity is validated by the caller against `BuiltinFunction::arity` before
/// the function runs.
pub type BuiltinFn = fn(&Interpreter, &[Value]) -> EvalResult;

/// A native free function (`len`, `print`, ...).
pub struct BuiltinFunction {
    pub name: &'static str,
    pub arity: ArgCount,
    pub func: BuiltinFn,
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<builtin {}>", self.name)
    }
}

/// User function: definition plus the environment active at its creation.
///
/// The environment is captured by reference; later mutations of bindings in
/// it are visible to the function.
pub struct FunctionValue {
    def: Rc<FunctionDef>,
    env: Environment,
    file: Rc<Path>,
}

impl FunctionValue {
    /// Close `def` over `env`. `file` is the source the body came from.
    pub fn new(def: Rc<FunctionDef>, env: Environment, file: Rc<Path>) -> Self {
        FunctionValue { def, env, file }
    }

    /// Declared name, or `<anonymous>` for a literal.
    pub fn name(&self) -> &str {
        self.def.name.as_ref().map_or("<anonymous>", |name| name.as_str())
    }

    /// The definition.
    pub fn def(&self) -> &FunctionDef {
        &self.def
    }

    /// The captured environment.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Source file of the body.
    pub fn file(&self) -> &Rc<Path> {
        &self.file
    }

    /// Exact parameter count.
    pub fn arity(&self) -> usize {
        self.def.params.len()
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name())
    }
}

/// Native method (`"a,b".split`, `xs.append`) bound to its receiver.
pub struct BuiltinMethod {
    pub receiver: Value,
    pub name: &'static str,
}

/// User method bound to a receiver.
///
/// For instance methods the receiver is the instance; for class methods it is
/// the class the method was accessed through. `owner` is the class whose
/// namespace defines the function; `super` inside the body searches from
/// `owner`'s parent.
pub struct BoundMethod {
    pub receiver: Value,
    pub function: super::Heap<FunctionValue>,
    pub owner: Class,
}
