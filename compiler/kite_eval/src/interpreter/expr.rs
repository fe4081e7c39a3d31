//! Expression evaluation, subscripts, attribute access and assignment targets.

use std::rc::Rc;

use kite_ir::{BinaryOp, Expr, Name};
use kite_stack::ensure_sufficient_stack;

use super::Interpreter;
use crate::builtins::lookup_builtin;
use crate::environment::{AssignError, Environment};
use crate::errors::{
    const_reassignment, index_out_of_range, key_not_found, no_such_attribute,
    read_only_attribute, super_assignment, type_mismatch, undefined_name, unreachable, EvalError,
    EvalResult,
};
use crate::methods::{lookup_method, normalize_index};
use crate::operators::evaluate_binary;
use crate::unary_operators::evaluate_unary;
use crate::value::{Dict, FunctionValue, Value};

impl Interpreter {
    /// Evaluate an expression.
    pub(crate) fn eval_expr(&mut self, expr: &Expr, env: &Environment) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr, env))
    }

    fn eval_expr_inner(&mut self, expr: &Expr, env: &Environment) -> EvalResult {
        match expr {
            Expr::Int(n) => Ok(Value::int(*n)),
            Expr::Str(s) => Ok(Value::string(s.as_ref())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Null => Ok(Value::Null),
            Expr::Ident(name) => lookup_name(name, env),
            Expr::List(items) => {
                let values = items
                    .iter()
                    .map(|item| self.eval_expr(item, env))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::list(values))
            }
            Expr::Dict(entries) => {
                let mut dict = Dict::new();
                for (key, value) in entries {
                    let key = self.eval_expr(key, env)?;
                    let value = self.eval_expr(value, env)?;
                    dict.insert(key, value)?;
                }
                Ok(Value::dict(dict))
            }
            Expr::Unary { op, operand } => {
                let operand = self.eval_expr(operand, env)?;
                evaluate_unary(&operand, *op)
            }
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right, env),
            Expr::Index { object, index } => {
                let object = self.eval_expr(object, env)?;
                let index = self.eval_expr(index, env)?;
                index_value(&object, &index)
            }
            Expr::Attribute { object, name } => {
                let object = self.eval_expr(object, env)?;
                get_attribute(&object, name.as_str())
            }
            Expr::SuperAttribute(name) => match env.method_context() {
                Some(context) => context.resolve_super(name.as_str()),
                None => Err(undefined_name("super")),
            },
            Expr::Call { callee, args } => {
                let callee = self.eval_expr(callee, env)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval_expr(arg, env))
                    .collect::<Result<Vec<_>, _>>()?;
                self.call_value(&callee, args)
            }
            Expr::Function(def) => Ok(Value::function(FunctionValue::new(
                Rc::clone(def),
                env.clone(),
                self.current_file(),
            ))),
            Expr::Import(path) => {
                let path = self.eval_expr(path, env)?;
                match path.as_str() {
                    Some(spec) => self.import(spec),
                    None => Err(type_mismatch("import()", "string", path.type_name())),
                }
            }
        }
    }

    /// Binary operators; `&&` and `||` evaluate their right side only when
    /// needed and always produce a boolean.
    fn eval_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        env: &Environment,
    ) -> EvalResult {
        match op {
            BinaryOp::And => {
                if !self.eval_expr(left, env)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval_expr(right, env)?.is_truthy()))
            }
            BinaryOp::Or => {
                if self.eval_expr(left, env)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval_expr(right, env)?.is_truthy()))
            }
            _ => {
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                evaluate_binary(&left, &right, op)
            }
        }
    }

    /// Store `value` into an assignment target.
    pub(crate) fn assign_to(
        &mut self,
        target: &Expr,
        value: Value,
        env: &Environment,
    ) -> Result<(), EvalError> {
        match target {
            Expr::Ident(name) => env.assign(name.as_str(), value).map_err(|err| match err {
                AssignError::Constant => const_reassignment(name.as_str()),
                AssignError::Undefined => undefined_name(name.as_str()),
            }),
            Expr::Index { object, index } => {
                let object = self.eval_expr(object, env)?;
                let index = self.eval_expr(index, env)?;
                set_index(&object, &index, value)
            }
            Expr::Attribute { object, name } => {
                let object = self.eval_expr(object, env)?;
                set_attribute(&object, name.as_str(), value)
            }
            Expr::SuperAttribute(_) => Err(super_assignment()),
            _ => Err(unreachable("invalid assignment target")),
        }
    }
}

/// Scope chain first, then the builtin table.
fn lookup_name(name: &Name, env: &Environment) -> EvalResult {
    if let Some(value) = env.lookup(name.as_str()) {
        return Ok(value);
    }
    match lookup_builtin(name.as_str()) {
        Some(builtin) => Ok(Value::Builtin(builtin)),
        None => Err(undefined_name(name.as_str())),
    }
}

fn require_index(container: &str, index: &Value) -> Result<i64, EvalError> {
    index.as_int().ok_or_else(|| {
        type_mismatch(
            &format!("{container} index"),
            "integer",
            index.type_name(),
        )
    })
}

/// `object[index]`.
pub(crate) fn index_value(object: &Value, index: &Value) -> EvalResult {
    match object {
        Value::List(items) => {
            let i = require_index("list", index)?;
            let items = items.borrow();
            normalize_index(i, items.len())
                .and_then(|at| items.get(at).cloned())
                .ok_or_else(|| index_out_of_range("list", i))
        }
        Value::Str(s) => {
            let i = require_index("string", index)?;
            normalize_index(i, s.char_len())
                .and_then(|at| s.char_at(at))
                .map(|c| Value::string(c.to_string()))
                .ok_or_else(|| index_out_of_range("string", i))
        }
        Value::Dict(dict) => dict
            .borrow()
            .lookup(index)?
            .cloned()
            .ok_or_else(|| key_not_found(&index.repr())),
        _ => Err(type_mismatch(
            "subscript",
            "list, string or dictionary",
            object.type_name(),
        )),
    }
}

/// `object[index] = value`.
fn set_index(object: &Value, index: &Value, value: Value) -> Result<(), EvalError> {
    match object {
        Value::List(items) => {
            let i = require_index("list", index)?;
            let mut items = items.borrow_mut();
            let at = normalize_index(i, items.len()).ok_or_else(|| index_out_of_range("list", i))?;
            if let Some(slot) = items.get_mut(at) {
                *slot = value;
            }
            Ok(())
        }
        Value::Dict(dict) => dict.borrow_mut().insert(index.clone(), value),
        _ => Err(type_mismatch(
            "item assignment",
            "list or dictionary",
            object.type_name(),
        )),
    }
}

/// `object.name`.
pub(crate) fn get_attribute(object: &Value, name: &str) -> EvalResult {
    match object {
        Value::Instance(instance) => instance.get_attribute(name),
        Value::Class(class) => class.get_attribute(name),
        Value::Module(module) => module.get_attribute(name),
        Value::Dict(dict) => dict
            .borrow()
            .get_str(name)
            .cloned()
            .ok_or_else(|| key_not_found(&Value::string(name).repr())),
        Value::Str(_) | Value::List(_) => match lookup_method(object, name) {
            Some(spec) => Ok(Value::builtin_method(object.clone(), spec.name)),
            None => Err(no_such_attribute(object.type_name(), name)),
        },
        _ => Err(no_such_attribute(object.type_name(), name)),
    }
}

/// `object.name = value`.
fn set_attribute(object: &Value, name: &str, value: Value) -> Result<(), EvalError> {
    match object {
        Value::Instance(instance) => instance.set_attribute(name, value),
        Value::Class(class) => class.set_class_member(name, value),
        Value::Dict(dict) => dict.borrow_mut().insert(Value::string(name), value),
        Value::Module(_) => Err(read_only_attribute("module", name)),
        _ => Err(no_such_attribute(object.type_name(), name)),
    }
}
