//! Classes, instances and member resolution.
//!
//! A class owns four namespaces (instance members, instance methods, class
//! members, class methods), each with its own constant set. Every class has a
//! parent except the per-session root class, so walks up the chain always end
//! at one well-known place.
//!
//! Resolution is never cached: each attribute access walks the chain from the
//! most-derived class outward, so methods added to an ancestor later are seen
//! by every descendant.

mod instance;

use std::cell::RefCell;
use std::fmt;
use std::iter;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use kite_ir::Name;

use crate::errors::{const_reassignment, no_such_attribute, redeclaration, EvalError, EvalResult};
use crate::value::{FunctionValue, Heap, Value};

pub use instance::{Instance, InstanceState, InstanceValue};

/// Name of the sentinel root class.
pub const ROOT_CLASS_NAME: &str = "object";

/// One namespace of a class: names to entries, plus the constant names.
#[derive(Clone, Debug)]
pub struct Namespace<T> {
    entries: FxHashMap<Name, T>,
    constants: FxHashSet<Name>,
}

impl<T> Default for Namespace<T> {
    fn default() -> Self {
        Namespace {
            entries: FxHashMap::default(),
            constants: FxHashSet::default(),
        }
    }
}

impl<T> Namespace<T> {
    /// Create an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. A name may appear once per namespace.
    pub fn declare(&mut self, name: Name, entry: T, constant: bool) -> Result<(), EvalError> {
        if self.entries.contains_key(name.as_str()) {
            return Err(redeclaration(name.as_str()));
        }
        if constant {
            self.constants.insert(name.clone());
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_constant(&self, name: &str) -> bool {
        self.constants.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &T)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite an existing entry. Returns `false` if `name` is absent.
    fn replace(&mut self, name: &str, entry: T) -> bool {
        match self.entries.get_mut(name) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }
}

/// The four namespaces of a class under construction.
#[derive(Default)]
pub struct ClassParts {
    /// Instance member defaults; `None` marks a member that `__init__` must set.
    pub instance_members: Namespace<Option<Value>>,
    pub instance_methods: Namespace<Heap<FunctionValue>>,
    pub class_members: Namespace<Value>,
    pub class_methods: Namespace<Heap<FunctionValue>>,
}

/// Class data.
pub struct ClassValue {
    name: Name,
    /// `None` only on the root sentinel.
    parent: Option<Class>,
    instance_members: Namespace<Option<Value>>,
    instance_methods: Namespace<Heap<FunctionValue>>,
    class_members: RefCell<Namespace<Value>>,
    class_methods: Namespace<Heap<FunctionValue>>,
}

/// Shared handle to a class.
#[derive(Clone)]
pub struct Class(Rc<ClassValue>);

impl Class {
    /// The sentinel root class. Each interpreter session creates its own.
    ///
    /// Only the root has no parent. Every user class gets a parent, so a
    /// lookup that walks past the root has searched the whole chain and
    /// `super` from a direct child of the root finds nothing instead of
    /// failing on a missing link.
    pub fn root() -> Class {
        Class(Rc::new(ClassValue {
            name: Name::from(ROOT_CLASS_NAME),
            parent: None,
            instance_members: Namespace::new(),
            instance_methods: Namespace::new(),
            class_members: RefCell::new(Namespace::new()),
            class_methods: Namespace::new(),
        }))
    }

    /// Create a class deriving from `parent`.
    pub fn new(name: Name, parent: Class, parts: ClassParts) -> Class {
        Class(Rc::new(ClassValue {
            name,
            parent: Some(parent),
            instance_members: parts.instance_members,
            instance_methods: parts.instance_methods,
            class_members: RefCell::new(parts.class_members),
            class_methods: parts.class_methods,
        }))
    }

    pub fn name(&self) -> &str {
        self.0.name.as_str()
    }

    /// Parent class; `None` only for the root.
    pub fn parent(&self) -> Option<&Class> {
        self.0.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.0.parent.is_none()
    }

    pub fn ptr_eq(&self, other: &Class) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// This class followed by its ancestors, most-derived first.
    pub fn ancestors(&self) -> impl Iterator<Item = Class> {
        iter::successors(Some(self.clone()), |class| class.parent().cloned())
    }

    /// Whether `self` is `other` or derives from it.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        self.ancestors().any(|class| class.ptr_eq(other))
    }

    /// Find an instance method and the class that defines it.
    pub fn find_instance_method(&self, name: &str) -> Option<(Heap<FunctionValue>, Class)> {
        self.ancestors().find_map(|class| {
            let method = class.0.instance_methods.get(name).cloned();
            method.map(|m| (m, class))
        })
    }

    /// Find a class method and the class that defines it.
    pub fn find_class_method(&self, name: &str) -> Option<(Heap<FunctionValue>, Class)> {
        self.ancestors().find_map(|class| {
            let method = class.0.class_methods.get(name).cloned();
            method.map(|m| (m, class))
        })
    }

    /// Find the class whose namespace owns the class member `name`.
    pub fn find_class_member_owner(&self, name: &str) -> Option<Class> {
        self.ancestors()
            .find(|class| class.0.class_members.borrow().contains(name))
    }

    /// Read a class member through the chain.
    pub fn class_member(&self, name: &str) -> Option<Value> {
        self.ancestors().find_map(|class| {
            let value = class.0.class_members.borrow().get(name).cloned();
            value
        })
    }

    /// Write a class member in the slot of the ancestor that owns it, so every
    /// class sharing that slot observes the change.
    pub fn set_class_member(&self, name: &str, value: Value) -> Result<(), EvalError> {
        let Some(owner) = self.find_class_member_owner(name) else {
            return Err(no_such_attribute(self.name(), name));
        };
        let mut members = owner.0.class_members.borrow_mut();
        if members.is_constant(name) {
            return Err(const_reassignment(name));
        }
        members.replace(name, value);
        Ok(())
    }

    /// Instance members flattened root-first, with the constant names.
    ///
    /// A subclass re-declaring a member overrides both its default and its
    /// constness.
    pub fn flatten_members(&self) -> (FxHashMap<Name, Option<Value>>, FxHashSet<Name>) {
        let mut chain: Vec<Class> = self.ancestors().collect();
        chain.reverse();

        let mut members = FxHashMap::default();
        let mut constants = FxHashSet::default();
        for class in &chain {
            let own = &class.0.instance_members;
            for (name, default) in own.iter() {
                members.insert(name.clone(), default.clone());
                if own.is_constant(name.as_str()) {
                    constants.insert(name.clone());
                } else {
                    constants.remove(name.as_str());
                }
            }
        }
        (members, constants)
    }

    /// Attribute read on the class itself (`Foo.x`): class members, then class
    /// methods bound to this class.
    pub fn get_attribute(&self, name: &str) -> EvalResult {
        if let Some(value) = self.class_member(name) {
            return Ok(value);
        }
        if let Some((function, owner)) = self.find_class_method(name) {
            return Ok(Value::bound_method(Value::Class(self.clone()), function, owner));
        }
        Err(no_such_attribute(self.name(), name))
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name())
    }
}

/// Context of a running method body: the class whose namespace defines the
/// body, and the receiver (`self`).
///
/// This is the anchor `super` resolves against.
#[derive(Clone, Debug)]
pub struct MethodContext {
    pub owner: Class,
    pub receiver: Value,
}

impl MethodContext {
    /// Resolve `super.name`.
    ///
    /// The search starts at the parent of the defining class (not the
    /// receiver's class) and covers instance methods, class members and class
    /// methods. Instance members are per-instance and never reachable here.
    pub fn resolve_super(&self, name: &str) -> EvalResult {
        let Some(start) = self.owner.parent() else {
            return Err(no_such_attribute("super", name));
        };

        if let Value::Instance(instance) = &self.receiver {
            if let Some((function, owner)) = start.find_instance_method(name) {
                return Ok(Value::bound_method(
                    Value::Instance(instance.clone()),
                    function,
                    owner,
                ));
            }
        }
        if let Some(value) = start.class_member(name) {
            return Ok(value);
        }
        if let Some((function, owner)) = start.find_class_method(name) {
            let receiver = match &self.receiver {
                Value::Instance(instance) => Value::Class(instance.class().clone()),
                other => other.clone(),
            };
            return Ok(Value::bound_method(receiver, function, owner));
        }
        Err(no_such_attribute("super", name))
    }
}
