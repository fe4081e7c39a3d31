//! Lexical environments.
//!
//! An `Environment` is a handle to one scope in a chain of scopes. Blocks and
//! function calls create child scopes; function values hold a handle to the
//! scope active at their creation, so several closures can alias one scope
//! and observe each other's writes.

use std::fmt;

use rustc_hash::FxHashMap;

use kite_ir::Name;

use crate::class::MethodContext;
use crate::value::{Shared, Teardown, Value};

/// Whether a binding can be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// `var x = ...`
    Mutable,
    /// `con x = ...`
    Constant,
}

impl Mutability {
    /// Returns `true` if this is `Mutable`.
    #[inline]
    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Mutable)
    }
}

/// Error returned by `Environment::assign`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// The owning scope marks the name constant.
    Constant,
    /// No scope in the chain owns the name.
    Undefined,
}

/// Error returned by `Environment::declare`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclareError {
    /// The name is already bound in this very scope.
    AlreadyDeclared,
}

/// A variable binding.
#[derive(Clone, Debug)]
struct Binding {
    value: Value,
    mutability: Mutability,
}

/// A single scope.
#[derive(Default)]
pub struct Scope {
    bindings: FxHashMap<Name, Binding>,
    parent: Option<Environment>,
    /// Set on the scope of a method call; `super` reads it.
    method: Option<MethodContext>,
}

impl Teardown for Scope {
    fn take_children(&mut self, out: &mut Vec<Value>) {
        out.extend(self.bindings.drain().map(|(_, binding)| binding.value));
    }
}

/// Handle to a scope and, through it, the whole chain.
#[derive(Clone)]
pub struct Environment(Shared<Scope>);

impl Environment {
    /// Move this scope's bound values into `out` if nothing else holds it.
    pub(crate) fn detach_bindings(&self, out: &mut Vec<Value>) {
        self.0.detach_children(out);
    }

    /// Create a root environment with no parent.
    pub fn new() -> Self {
        Environment(Shared::new(Scope::default()))
    }

    /// Create a nested scope whose outer link is `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Environment(Shared::new(Scope {
            bindings: FxHashMap::default(),
            parent: Some(self.clone()),
            method: None,
        }))
    }

    /// Create the call scope of a method: a child of `self` that records
    /// which class defines the running body and who received the call.
    #[must_use]
    pub fn method_scope(&self, context: MethodContext) -> Self {
        Environment(Shared::new(Scope {
            bindings: FxHashMap::default(),
            parent: Some(self.clone()),
            method: Some(context),
        }))
    }

    /// Declare a name in this scope only.
    ///
    /// Shadowing an outer binding is legal; re-declaring a name already bound
    /// in this scope is not.
    pub fn declare(
        &self,
        name: Name,
        value: Value,
        mutability: Mutability,
    ) -> Result<(), DeclareError> {
        let mut scope = self.0.borrow_mut();
        if scope.bindings.contains_key(name.as_str()) {
            return Err(DeclareError::AlreadyDeclared);
        }
        scope.bindings.insert(name, Binding { value, mutability });
        Ok(())
    }

    /// Bind a call parameter. Unchecked: parameters may shadow anything and
    /// are never constant.
    pub fn bind_parameter(&self, name: Name, value: Value) {
        self.0.borrow_mut().bindings.insert(
            name,
            Binding {
                value,
                mutability: Mutability::Mutable,
            },
        );
    }

    /// Look up a name, innermost scope first.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut current = self.clone();
        loop {
            let parent = {
                let scope = current.0.borrow();
                if let Some(binding) = scope.bindings.get(name) {
                    return Some(binding.value.clone());
                }
                scope.parent.clone()
            };
            current = parent?;
        }
    }

    /// Look up a name in this scope only.
    pub fn lookup_local(&self, name: &str) -> Option<Value> {
        self.0
            .borrow()
            .bindings
            .get(name)
            .map(|binding| binding.value.clone())
    }

    /// Assign to the nearest scope owning `name`.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), AssignError> {
        let mut current = self.clone();
        loop {
            let parent = {
                let mut scope = current.0.borrow_mut();
                if let Some(binding) = scope.bindings.get_mut(name) {
                    if !binding.mutability.is_mutable() {
                        return Err(AssignError::Constant);
                    }
                    binding.value = value;
                    return Ok(());
                }
                scope.parent.clone()
            };
            match parent {
                Some(parent) => current = parent,
                None => return Err(AssignError::Undefined),
            }
        }
    }

    /// Whether the nearest scope owning `name` marks it constant.
    pub fn is_constant(&self, name: &str) -> bool {
        let mut current = self.clone();
        loop {
            let parent = {
                let scope = current.0.borrow();
                if let Some(binding) = scope.bindings.get(name) {
                    return !binding.mutability.is_mutable();
                }
                scope.parent.clone()
            };
            match parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// The method context of the innermost enclosing method call, if any.
    pub fn method_context(&self) -> Option<MethodContext> {
        let mut current = self.clone();
        loop {
            let parent = {
                let scope = current.0.borrow();
                if let Some(context) = &scope.method {
                    return Some(context.clone());
                }
                scope.parent.clone()
            };
            current = parent?;
        }
    }

    /// The outer scope.
    pub fn parent(&self) -> Option<Environment> {
        self.0.borrow().parent.clone()
    }

    /// Whether both handles refer to the same scope.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        self.0.ptr_eq(&other.0)
    }

    /// Number of scopes in the chain, this one included.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.parent();
        while let Some(env) = current {
            depth += 1;
            current = env.parent();
        }
        depth
    }

    /// Names bound in this scope, sorted.
    pub fn local_names(&self) -> Vec<Name> {
        let mut names: Vec<Name> = self.0.borrow().bindings.keys().cloned().collect();
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        names
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("scope", &self.0)
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests;
