//! Function application and instance construction.

use kite_ir::Name;
use kite_stack::ensure_sufficient_stack;

use super::{ControlFlow, Interpreter, INIT_METHOD, SELF_NAME};
use crate::class::{Class, Instance, MethodContext};
use crate::diagnostics::CallFrame;
use crate::errors::{not_callable, unreachable, wrong_arg_count, ArgCount, EvalResult};
use crate::methods::call_builtin_method;
use crate::value::{FunctionValue, Value};

impl Interpreter {
    /// Apply a callable value to evaluated arguments.
    pub fn call_value(&mut self, callee: &Value, args: Vec<Value>) -> EvalResult {
        ensure_sufficient_stack(|| match callee {
            Value::Function(func) => self.call_function(func, args, None),
            Value::Builtin(builtin) => {
                if !builtin.arity.accepts(args.len()) {
                    return Err(wrong_arg_count(builtin.name, builtin.arity, args.len()));
                }
                (builtin.func)(self, &args)
            }
            Value::BuiltinMethod(method) => call_builtin_method(&method.receiver, method.name, &args),
            Value::BoundMethod(method) => {
                let context = MethodContext {
                    owner: method.owner.clone(),
                    receiver: method.receiver.clone(),
                };
                self.call_function(&method.function, args, Some(context))
            }
            Value::Class(class) => self.instantiate(class, args),
            _ => Err(not_callable(callee.type_name())),
        })
    }

    /// Run a user function body in a fresh child of its captured environment.
    ///
    /// Methods get a scope that also records the owning class and binds
    /// `self`; that record is what `super` resolves against.
    #[tracing::instrument(level = "debug", skip_all, fields(function = func.name()))]
    pub(crate) fn call_function(
        &mut self,
        func: &FunctionValue,
        args: Vec<Value>,
        method: Option<MethodContext>,
    ) -> EvalResult {
        let arity = func.arity();
        if args.len() != arity {
            return Err(wrong_arg_count(
                func.name(),
                ArgCount::Exact(arity),
                args.len(),
            ));
        }

        let scope = match method {
            Some(context) => {
                let receiver = context.receiver.clone();
                let scope = func.env().method_scope(context);
                scope.bind_parameter(Name::new(SELF_NAME), receiver);
                scope
            }
            None => func.env().child(),
        };
        for (param, arg) in func.def().params.iter().zip(args) {
            scope.bind_parameter(param.clone(), arg);
        }

        let frame = CallFrame::new(func.file().clone(), func.name());
        let flow = self.with_frame(frame, |interp| interp.exec_block(&func.def().body, &scope))?;
        match flow {
            ControlFlow::Normal(value) | ControlFlow::Return(value) => Ok(value),
            ControlFlow::Break => Err(unreachable("'break' outside loop")),
            ControlFlow::Continue => Err(unreachable("'continue' outside loop")),
        }
    }

    /// Construct an instance: flatten members, run `__init__` if the chain
    /// defines one, then check that every pending member was assigned.
    fn instantiate(&mut self, class: &Class, args: Vec<Value>) -> EvalResult {
        let instance = Instance::new(class.clone());
        let receiver = Value::Instance(instance.clone());

        match class.find_instance_method(INIT_METHOD) {
            Some((init, owner)) => {
                let context = MethodContext {
                    owner,
                    receiver: receiver.clone(),
                };
                self.call_function(&init, args, Some(context))?;
            }
            None if !args.is_empty() => {
                return Err(wrong_arg_count(
                    INIT_METHOD,
                    ArgCount::Exact(0),
                    args.len(),
                ));
            }
            None => {}
        }

        instance.finish_construction()?;
        Ok(receiver)
    }
}
