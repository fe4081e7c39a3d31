//! Tree-walking interpreter for Kite programs.
//!
//! One `Interpreter` is one evaluation session: it owns the module cache, the
//! call stack, the loaded source text and the output handler. Nothing here is
//! global, so independent sessions in one process never see each other's
//! modules.
//!
//! # Module Organization
//!
//! - `builder`: `InterpreterBuilder`, the configuration layer
//! - `stmt`: statement execution and `ControlFlow` propagation
//! - `expr`: expression evaluation, indexing, attribute access, assignment
//! - `call`: function application and instance construction
//! - `classes`: class definition
//! - `iteration`: the for-in iterator protocol
//! - `modules`: `import` and `export`

mod builder;
mod call;
mod classes;
mod expr;
mod iteration;
mod modules;
mod stmt;

use std::path::Path;
use std::rc::Rc;

use kite_ir::{Program, Stmt};

use crate::class::Class;
use crate::diagnostics::{render_traceback, CallFrame, CallStack, SourceMap};
use crate::environment::Environment;
use crate::errors::{unreachable, EvalBacktrace, EvalError, EvalResult};
use crate::module::{Module, ModuleCache, ModuleLoader};
use crate::print_handler::SharedPrintHandler;
use crate::value::Value;

pub use builder::{InterpreterBuilder, DEFAULT_MAX_RECURSION_DEPTH};
pub use iteration::{IterStep, ValueIter};
pub use stmt::ControlFlow;

/// File name recorded for programs run in an environment that is not a
/// registered module.
pub const SCRIPT_FILE_NAME: &str = "<script>";

/// Name the receiver is bound to inside a method body.
pub const SELF_NAME: &str = "self";

/// Constructor hook looked up on the class chain when a class is called.
pub const INIT_METHOD: &str = "__init__";

/// User iteration hook.
pub const ITER_METHOD: &str = "__iter__";

/// Evaluation session.
pub struct Interpreter {
    /// Sentinel top of every class chain.
    pub(crate) root_class: Class,
    /// Modules evaluated in this session, keyed by resolved path.
    pub(crate) modules: ModuleCache,
    pub(crate) call_stack: CallStack,
    pub(crate) sources: SourceMap,
    pub(crate) loader: Box<dyn ModuleLoader>,
    pub(crate) print_handler: SharedPrintHandler,
    /// First-fault snapshot of the most recent failed run.
    exception_trace: Option<EvalBacktrace>,
}

impl Interpreter {
    /// Create an interpreter with default configuration.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    /// Run `program` in `env` and return its value, or an `Error` value.
    ///
    /// The program's statements run directly in `env`, so repeated calls
    /// against one environment see each other's bindings.
    pub fn evaluate(&mut self, program: &Program, env: &Environment) -> Value {
        match self.try_evaluate(program, env) {
            Ok(value) => value,
            Err(err) => Value::error(err),
        }
    }

    /// Run `program` in `env`, keeping the failure as an `Err`.
    pub fn try_evaluate(&mut self, program: &Program, env: &Environment) -> EvalResult {
        self.exception_trace = None;
        let result = match self.modules.find_by_env(env) {
            Some(module) => self.run_module_body(&module, &program.statements),
            None => {
                let frame = CallFrame::module(Rc::from(Path::new(SCRIPT_FILE_NAME)));
                self.with_frame(frame, |interp| {
                    interp.exec_top_level(&program.statements, env)
                })
            }
        };

        result.map_err(|err| {
            self.exception_trace.clone_from(&err.backtrace);
            err
        })
    }

    /// Create the root environment of a module at `path` and register the
    /// module in this session's cache.
    ///
    /// Calling this twice with one path returns the first environment.
    pub fn new_module_environment(&mut self, path: impl AsRef<Path>) -> Environment {
        let module = Module::new(Rc::from(path.as_ref()), Environment::new());
        self.modules.insert(module).env().clone()
    }

    /// First-fault call stack of the most recent failed `evaluate`.
    pub fn exception_trace(&self) -> Option<&EvalBacktrace> {
        self.exception_trace.as_ref()
    }

    /// Render `err` as a traceback using the sources known to this session.
    pub fn format_error(&self, err: &EvalError) -> String {
        render_traceback(err, &self.sources)
    }

    /// Make the text of `path` available to tracebacks.
    pub fn register_source(&mut self, path: impl AsRef<Path>, source: &str) {
        self.sources.insert(path.as_ref(), Rc::from(source));
    }

    /// Where `print` writes.
    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// The sentinel root class.
    pub fn root_class(&self) -> &Class {
        &self.root_class
    }

    /// The module evaluated from `path` in this session, if any.
    pub fn module(&self, path: &Path) -> Option<Module> {
        self.modules.get(path)
    }

    /// Current call-stack depth.
    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    /// Run `f` with `frame` pushed, popping it on every exit path.
    pub(crate) fn with_frame<T>(
        &mut self,
        frame: CallFrame,
        f: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        self.call_stack.push(frame)?;
        let result = f(self);
        self.call_stack.pop();
        result
    }

    /// File of the code currently executing.
    pub(crate) fn current_file(&self) -> Rc<Path> {
        self.call_stack
            .current_file()
            .unwrap_or_else(|| Rc::from(Path::new(SCRIPT_FILE_NAME)))
    }

    /// Execute top-level statements: `return` ends the program with its
    /// value; `break`/`continue` cannot escape.
    fn exec_top_level(&mut self, statements: &[Stmt], env: &Environment) -> EvalResult {
        let err = match self.exec_block(statements, env)? {
            ControlFlow::Normal(value) | ControlFlow::Return(value) => return Ok(value),
            ControlFlow::Break => unreachable("'break' outside loop"),
            ControlFlow::Continue => unreachable("'continue' outside loop"),
        };
        Err(self.call_stack.attach_backtrace(err))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
