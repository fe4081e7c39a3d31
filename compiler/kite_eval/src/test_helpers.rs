//! Helpers for evaluator tests.
//!
//! Programs are built with `kite_ir::ast::build` and run in a session whose
//! `print` output is captured.

#![allow(clippy::unwrap_used)]

use kite_ir::{Program, Stmt};

use crate::environment::Environment;
use crate::errors::{EvalError, EvalResult};
use crate::interpreter::{Interpreter, InterpreterBuilder};
use crate::module::ModuleLoader;
use crate::print_handler::{buffer_handler, SharedPrintHandler};
use crate::value::Value;

/// Path the test module environment is registered under.
pub const MAIN_FILE: &str = "main.kite";

/// An interpreter, its captured output and a module environment.
pub struct TestSession {
    pub interp: Interpreter,
    pub env: Environment,
    output: SharedPrintHandler,
}

impl TestSession {
    pub fn new() -> Self {
        Self::from_builder(InterpreterBuilder::new())
    }

    pub fn with_loader(loader: impl ModuleLoader + 'static) -> Self {
        Self::from_builder(InterpreterBuilder::new().module_loader(loader))
    }

    pub fn from_builder(builder: InterpreterBuilder) -> Self {
        crate::init_tracing();
        let output = buffer_handler();
        let mut interp = builder.print_handler(output.clone()).build();
        let env = interp.new_module_environment(MAIN_FILE);
        TestSession {
            interp,
            env,
            output,
        }
    }

    /// Run statements in the session environment.
    pub fn run(&mut self, statements: Vec<Stmt>) -> EvalResult {
        self.interp
            .try_evaluate(&Program::new(statements), &self.env)
    }

    /// Everything printed so far.
    pub fn output(&self) -> String {
        self.output.output()
    }
}

/// Run statements in a fresh session.
pub fn run(statements: Vec<Stmt>) -> EvalResult {
    TestSession::new().run(statements)
}

/// Run statements in a fresh session, expecting success.
pub fn eval_ok(statements: Vec<Stmt>) -> Value {
    run(statements).unwrap()
}

/// Run statements in a fresh session, expecting failure.
pub fn eval_err(statements: Vec<Stmt>) -> EvalError {
    match run(statements) {
        Ok(value) => panic!("expected an error, got {value:?}"),
        Err(err) => err,
    }
}

/// Number statements from line 1 in order.
pub fn numbered(statements: Vec<Stmt>) -> Vec<Stmt> {
    statements
        .into_iter()
        .zip(1..)
        .map(|(stmt, line)| stmt.at(line))
        .collect()
}
