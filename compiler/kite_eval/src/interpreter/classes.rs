//! Class definition.

use std::rc::Rc;

use kite_ir::{ClassDef, MemberLevel};

use super::Interpreter;
use crate::class::{Class, ClassParts};
use crate::environment::Environment;
use crate::errors::{type_mismatch, unreachable, EvalResult};
use crate::value::{FunctionValue, Heap, Value};

impl Interpreter {
    /// Build a class from its definition.
    ///
    /// Member defaults are evaluated now, in `env`; methods close over `env`.
    /// Nothing is copied from the parent: lookups walk the chain at use time.
    pub(crate) fn define_class(&mut self, def: &ClassDef, env: &Environment) -> EvalResult<Class> {
        let parent = match &def.parent {
            Some(expr) => match self.eval_expr(expr, env)? {
                Value::Class(class) => class,
                other => {
                    return Err(type_mismatch(
                        "class parent",
                        "class",
                        other.type_name(),
                    ))
                }
            },
            None => self.root_class.clone(),
        };

        let mut parts = ClassParts::default();
        for member in &def.members {
            if member.line > 0 {
                self.call_stack.set_line(member.line);
            }
            let default = match &member.default {
                Some(expr) => Some(self.eval_expr(expr, env)?),
                None => None,
            };
            let name = member.name.clone();
            match member.level {
                MemberLevel::Instance => {
                    parts
                        .instance_members
                        .declare(name, default, member.constant)?;
                }
                MemberLevel::Class => {
                    parts.class_members.declare(
                        name,
                        default.unwrap_or(Value::Null),
                        member.constant,
                    )?;
                }
            }
        }

        let file = self.current_file();
        for method in &def.methods {
            let Some(name) = method.function.name.clone() else {
                return Err(unreachable("method without a name"));
            };
            let function = Heap::new(FunctionValue::new(
                Rc::clone(&method.function),
                env.clone(),
                Rc::clone(&file),
            ));
            let namespace = match method.level {
                MemberLevel::Instance => &mut parts.instance_methods,
                MemberLevel::Class => &mut parts.class_methods,
            };
            namespace.declare(name, function, false)?;
        }

        tracing::debug!(
            class = %def.name,
            parent = parent.name(),
            members = def.members.len(),
            methods = def.methods.len(),
            "defined class"
        );
        Ok(Class::new(def.name.clone(), parent, parts))
    }
}
