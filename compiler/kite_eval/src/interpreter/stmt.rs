//! Statement execution.
//!
//! `return`, `break` and `continue` travel as `ControlFlow` variants in the
//! `Ok` channel; every compound statement checks the variant of each nested
//! statement and hands anything but `Normal` straight back to its caller.

use kite_ir::{Block, Expr, Name, Stmt, StmtKind};
use kite_stack::ensure_sufficient_stack;

use super::Interpreter;
use crate::environment::{Environment, Mutability};
use crate::errors::{redeclaration, unpack_mismatch, EvalError};
use crate::value::{FunctionValue, Value};

/// Outcome of executing a statement.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlFlow {
    /// Completed; carries the statement's value.
    Normal(Value),
    Return(Value),
    Break,
    Continue,
}

pub(crate) type ExecResult = Result<ControlFlow, EvalError>;

impl Interpreter {
    /// Execute `statements` in `env`; the value is that of the last statement.
    pub(crate) fn exec_block(&mut self, statements: &[Stmt], env: &Environment) -> ExecResult {
        let mut last = Value::Null;
        for stmt in statements {
            match self.exec_stmt(stmt, env)? {
                ControlFlow::Normal(value) => last = value,
                signal => return Ok(signal),
            }
        }
        Ok(ControlFlow::Normal(last))
    }

    /// Execute one statement, recording its line in the current frame.
    ///
    /// The first error raised picks up a snapshot of the call stack here,
    /// while the frames that produced it are still pushed.
    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt, env: &Environment) -> ExecResult {
        if stmt.line > 0 {
            self.call_stack.set_line(stmt.line);
        }
        tracing::trace!(line = stmt.line, "exec");
        ensure_sufficient_stack(|| self.exec_stmt_inner(&stmt.kind, env))
            .map_err(|err| self.call_stack.attach_backtrace(err))
    }

    fn exec_stmt_inner(&mut self, kind: &StmtKind, env: &Environment) -> ExecResult {
        match kind {
            StmtKind::Declare {
                name,
                constant,
                value,
            } => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Value::Null,
                };
                declare(env, name, value, mutability(*constant))?;
                Ok(ControlFlow::Normal(Value::Null))
            }
            StmtKind::Assign { target, value } => {
                let value = self.eval_expr(value, env)?;
                self.assign_to(target, value.clone(), env)?;
                Ok(ControlFlow::Normal(value))
            }
            StmtKind::Expr(expr) => Ok(ControlFlow::Normal(self.eval_expr(expr, env)?)),
            StmtKind::Block(statements) => self.exec_block(statements, &env.child()),
            StmtKind::If {
                branches,
                otherwise,
            } => {
                for (condition, body) in branches {
                    if self.eval_expr(condition, env)?.is_truthy() {
                        return self.exec_block(body, &env.child());
                    }
                }
                match otherwise {
                    Some(body) => self.exec_block(body, &env.child()),
                    None => Ok(ControlFlow::Normal(Value::Null)),
                }
            }
            StmtKind::While { condition, body } => self.exec_while(condition, body, env),
            StmtKind::ForIn {
                targets,
                constant,
                iterable,
                body,
            } => self.exec_for(targets, *constant, iterable, body, env),
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Value::Null,
                };
                Ok(ControlFlow::Return(value))
            }
            StmtKind::Break => Ok(ControlFlow::Break),
            StmtKind::Continue => Ok(ControlFlow::Continue),
            StmtKind::Function(def) => {
                let Some(name) = def.name.clone() else {
                    return Err(crate::errors::unreachable(
                        "function declaration without a name",
                    ));
                };
                let func = FunctionValue::new(def.clone(), env.clone(), self.current_file());
                declare(env, &name, Value::function(func), Mutability::Mutable)?;
                Ok(ControlFlow::Normal(Value::Null))
            }
            StmtKind::Class(def) => {
                let class = self.define_class(def, env)?;
                declare(env, &def.name, Value::Class(class), Mutability::Mutable)?;
                Ok(ControlFlow::Normal(Value::Null))
            }
            StmtKind::Export(names) => {
                self.export(names)?;
                Ok(ControlFlow::Normal(Value::Null))
            }
        }
    }

    fn exec_while(&mut self, condition: &Expr, body: &Block, env: &Environment) -> ExecResult {
        while self.eval_expr(condition, env)?.is_truthy() {
            match self.exec_block(body, &env.child())? {
                ControlFlow::Break => break,
                ControlFlow::Normal(_) | ControlFlow::Continue => {}
                ret @ ControlFlow::Return(_) => return Ok(ret),
            }
        }
        Ok(ControlFlow::Normal(Value::Null))
    }

    /// `for (var a, b in subject) { body }`.
    ///
    /// Each step binds the targets in a fresh scope, so closures created in
    /// the body capture that step's values.
    fn exec_for(
        &mut self,
        targets: &[Name],
        constant: bool,
        iterable: &Expr,
        body: &Block,
        env: &Environment,
    ) -> ExecResult {
        let subject = self.eval_expr(iterable, env)?;
        let iter = self.iterate(&subject)?;
        for step in iter {
            let values = step.into_values();
            if values.len() != targets.len() {
                return Err(unpack_mismatch(targets.len(), values.len()));
            }
            let scope = env.child();
            for (target, value) in targets.iter().zip(values) {
                declare(&scope, target, value, mutability(constant))?;
            }
            match self.exec_block(body, &scope)? {
                ControlFlow::Break => break,
                ControlFlow::Normal(_) | ControlFlow::Continue => {}
                ret @ ControlFlow::Return(_) => return Ok(ret),
            }
        }
        Ok(ControlFlow::Normal(Value::Null))
    }
}

fn mutability(constant: bool) -> Mutability {
    if constant {
        Mutability::Constant
    } else {
        Mutability::Mutable
    }
}

fn declare(
    env: &Environment,
    name: &Name,
    value: Value,
    mutability: Mutability,
) -> Result<(), EvalError> {
    env.declare(name.clone(), value, mutability)
        .map_err(|_| redeclaration(name.as_str()))
}
