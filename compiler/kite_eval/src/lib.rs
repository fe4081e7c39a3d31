//! Kite Eval - tree-walking evaluator for the Kite scripting language.
//!
//! This crate takes a finished `kite_ir::Program` and runs it.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `Environment`: chained lexical scopes shared by reference, so closures
//!   observe later writes to the bindings they captured
//! - `evaluate_binary` / `evaluate_unary`: dispatch on the concrete operand types
//! - `Class` / `Instance`: dynamic method resolution over an explicit parent
//!   chain rooted at a sentinel class, with `super` anchored at the class that
//!   defines the running method
//! - `ModuleCache`: per-session cache of imported modules keyed by path
//! - `CallStack`: frames for recursion limits and first-fault tracebacks
//!
//! # Host surface
//!
//! ```text
//! let mut interp = InterpreterBuilder::new().build();
//! let env = interp.new_module_environment("main.kite");
//! let value = interp.evaluate(&program, &env);
//! if is_error_value(&value) { /* report */ }
//! ```

mod builtins;
pub mod class;
pub mod diagnostics;
mod environment;
pub mod errors;
pub mod interpreter;
mod methods;
pub mod module;
mod operators;
mod print_handler;
mod unary_operators;
pub mod value;

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

use std::sync::Once;

pub use builtins::{builtin_names, lookup_builtin};
pub use class::{Class, Instance, InstanceState, MethodContext, ROOT_CLASS_NAME};
pub use diagnostics::{render_traceback, CallFrame, CallStack, SourceMap};
pub use environment::{AssignError, DeclareError, Environment, Mutability};
pub use errors::{ArgCount, EvalBacktrace, EvalError, EvalErrorKind, EvalResult};
pub use interpreter::{
    ControlFlow, Interpreter, InterpreterBuilder, IterStep, ValueIter,
    DEFAULT_MAX_RECURSION_DEPTH,
};
pub use methods::{call_builtin_method, format_template, lookup_method, MethodSpec};
pub use module::{
    FsModuleLoader, LoadError, LoadedModule, MemoryModuleLoader, Module, ModuleCache,
    ModuleLoader, NoModuleLoader, SourceParser, DEFAULT_EXTENSION,
};
pub use operators::evaluate_binary;
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler,
};
pub use unary_operators::evaluate_unary;
pub use value::{Dict, HashKey, TypeTag, Value};

/// Whether `value` is the error value a failed evaluation produces.
pub fn is_error_value(value: &Value) -> bool {
    value.is_error()
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber for debug output.
///
/// Reads the filter from `RUST_LOG`, e.g. `RUST_LOG=kite_eval=debug`.
/// Safe to call more than once; does nothing when `RUST_LOG` is unset.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
